//! GPU texture allocation with a recycle pool.
//!
//! Freed texture objects are parked by shape (size, format and sampling
//! config) and rewritten in place by the next allocation of the same shape,
//! so scenes that load and unload the same assets don't churn GPU objects.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use super::texture::{PixelFormat, TextureConfig, TextureData};
use crate::error::{EngineError, EngineResult};
use crate::renderer::backend::{BackendError, GpuBackend, GpuResource, GpuTextureId, TextureDesc};

new_key_type! {
    /// Generational handle to an allocated texture. Stale after `free`.
    pub struct TextureHandle;
}

/// A live texture owned by the allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D {
    pub gpu: GpuTextureId,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub config: TextureConfig,
    pub label: String,
}

impl Texture2D {
    fn shape(&self) -> TextureShape {
        TextureShape {
            width: self.width,
            height: self.height,
            format: self.format,
            config: self.config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TextureShape {
    width: u32,
    height: u32,
    format: PixelFormat,
    config: TextureConfig,
}

pub struct TextureAllocator {
    textures: SlotMap<TextureHandle, Texture2D>,
    pool: HashMap<TextureShape, Vec<GpuTextureId>>,
    pool_limit: usize,
    created: usize,
    reused: usize,
}

impl TextureAllocator {
    /// `pool_limit` caps how many freed objects are kept per shape.
    pub fn new(pool_limit: usize) -> Self {
        Self {
            textures: SlotMap::with_key(),
            pool: HashMap::new(),
            pool_limit,
            created: 0,
            reused: 0,
        }
    }

    /// Upload `data` and return a handle to the new texture.
    ///
    /// Reuses a pooled object of the same shape when one is available.
    /// Nothing is registered when the backend fails.
    pub fn allocate(
        &mut self,
        gpu: &mut dyn GpuBackend,
        data: &TextureData,
        config: TextureConfig,
        label: &str,
    ) -> EngineResult<TextureHandle> {
        let shape = TextureShape {
            width: data.width,
            height: data.height,
            format: data.format,
            config,
        };

        let gpu_id = match self.take_pooled(gpu, shape, &data.pixels) {
            Some(id) => {
                self.reused += 1;
                id
            }
            None => {
                let desc = TextureDesc {
                    width: data.width,
                    height: data.height,
                    format: data.format,
                    config,
                };
                let id = gpu
                    .create_texture(&desc, &data.pixels)
                    .map_err(|e| upload_error(label, e))?;
                self.created += 1;
                id
            }
        };

        log::debug!("texture '{}' {}x{} -> gpu {}", label, data.width, data.height, gpu_id.0);
        Ok(self.textures.insert(Texture2D {
            gpu: gpu_id,
            width: data.width,
            height: data.height,
            format: data.format,
            config,
            label: label.to_string(),
        }))
    }

    fn take_pooled(&mut self, gpu: &mut dyn GpuBackend, shape: TextureShape, pixels: &[u8]) -> Option<GpuTextureId> {
        let id = self.pool.get_mut(&shape)?.pop()?;
        match gpu.write_texture(id, pixels) {
            Ok(()) => Some(id),
            Err(e) => {
                log::warn!("pooled texture {} rejected rewrite ({}), discarding it", id.0, e);
                if let Err(e) = gpu.destroy(GpuResource::Texture(id)) {
                    log::warn!("failed to destroy texture {}: {}", id.0, e);
                }
                None
            }
        }
    }

    /// Free a texture. Its GPU object is pooled or destroyed.
    ///
    /// Freeing a stale handle reports `DoubleFree` and changes nothing.
    pub fn free(&mut self, gpu: &mut dyn GpuBackend, handle: TextureHandle) -> EngineResult<()> {
        let texture = self.textures.remove(handle).ok_or(EngineError::DoubleFree)?;
        let shape = texture.shape();
        let parked = self.pool.entry(shape).or_default();
        if parked.len() < self.pool_limit {
            parked.push(texture.gpu);
        } else if let Err(e) = gpu.destroy(GpuResource::Texture(texture.gpu)) {
            log::warn!("failed to destroy texture '{}': {}", texture.label, e);
        }
        Ok(())
    }

    pub fn get(&self, handle: TextureHandle) -> EngineResult<&Texture2D> {
        self.textures.get(handle).ok_or(EngineError::ResourceNotFound)
    }

    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(handle)
    }

    /// Live textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Freed objects waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.pool.values().map(Vec::len).sum()
    }

    /// GPU objects ever created by this allocator.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Allocations served from the pool.
    pub fn reused(&self) -> usize {
        self.reused
    }

    /// Destroy every pooled object.
    pub fn trim(&mut self, gpu: &mut dyn GpuBackend) {
        for (_, ids) in self.pool.drain() {
            for id in ids {
                if let Err(e) = gpu.destroy(GpuResource::Texture(id)) {
                    log::warn!("failed to destroy pooled texture {}: {}", id.0, e);
                }
            }
        }
    }

    /// Destroy everything, live textures included.
    pub fn clear(&mut self, gpu: &mut dyn GpuBackend) {
        for (_, texture) in self.textures.drain() {
            if let Err(e) = gpu.destroy(GpuResource::Texture(texture.gpu)) {
                log::warn!("failed to destroy texture '{}': {}", texture.label, e);
            }
        }
        self.trim(gpu);
    }
}

pub(crate) fn upload_error(label: &str, err: BackendError) -> EngineError {
    match err {
        BackendError::OutOfMemory { .. } => EngineError::OutOfMemory { what: label.to_string() },
        other => EngineError::LoadError { path: label.to_string(), reason: other.to_string() },
    }
}
