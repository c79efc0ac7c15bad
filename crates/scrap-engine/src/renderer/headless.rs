//! Headless backend that records every call instead of touching a GPU.
//!
//! Used by tests and the demo binary. It tracks live objects and a byte
//! budget so allocator and renderer error paths can be exercised.

use std::collections::{HashMap, HashSet};

use super::backend::{
    BackendError, DrawCall, GpuBackend, GpuBufferId, GpuResource, GpuTextureId, TextureDesc, Viewport,
};
use super::vertex::Vertex;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateTexture { id: GpuTextureId, width: u32, height: u32 },
    WriteTexture { id: GpuTextureId },
    CreateBuffer { id: GpuBufferId, vertex_count: usize },
    WriteBuffer { id: GpuBufferId, vertex_count: usize },
    Destroy(GpuResource),
    SetViewport(Viewport),
    Clear([f32; 4]),
    Draw(DrawCall),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_id: u32,
    textures: HashMap<GpuTextureId, usize>,
    buffers: HashMap<GpuBufferId, usize>,
    memory_budget: Option<usize>,
    memory_used: usize,
    rejected_textures: HashSet<GpuTextureId>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail allocations that would push total live bytes past `bytes`.
    pub fn with_memory_budget(bytes: usize) -> Self {
        Self {
            memory_budget: Some(bytes),
            ..Self::default()
        }
    }

    /// Make every draw that samples `texture` fail.
    pub fn reject_draws_with(&mut self, texture: GpuTextureId) {
        self.rejected_textures.insert(texture);
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// Number of fresh texture objects created (excludes rewrites of pooled ones).
    pub fn texture_creations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::CreateTexture { .. }))
            .count()
    }

    pub fn buffer_creations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::CreateBuffer { .. }))
            .count()
    }

    pub fn destroyed(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Destroy(_)))
            .count()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn has_texture(&self, id: GpuTextureId) -> bool {
        self.textures.contains_key(&id)
    }

    pub fn memory_used(&self) -> usize {
        self.memory_used
    }

    fn reserve(&mut self, bytes: usize) -> Result<(), BackendError> {
        if let Some(budget) = self.memory_budget {
            let available = budget.saturating_sub(self.memory_used);
            if bytes > available {
                return Err(BackendError::OutOfMemory { requested: bytes, available });
            }
        }
        self.memory_used += bytes;
        Ok(())
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GpuBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<GpuTextureId, BackendError> {
        let expected = desc.byte_len();
        if pixels.len() != expected {
            return Err(BackendError::SizeMismatch { expected, actual: pixels.len() });
        }
        self.reserve(expected)?;
        let id = GpuTextureId(self.next_id());
        self.textures.insert(id, expected);
        self.calls.push(BackendCall::CreateTexture { id, width: desc.width, height: desc.height });
        Ok(id)
    }

    fn write_texture(&mut self, id: GpuTextureId, pixels: &[u8]) -> Result<(), BackendError> {
        let expected = *self
            .textures
            .get(&id)
            .ok_or(BackendError::InvalidResource(GpuResource::Texture(id)))?;
        if pixels.len() != expected {
            return Err(BackendError::SizeMismatch { expected, actual: pixels.len() });
        }
        self.calls.push(BackendCall::WriteTexture { id });
        Ok(())
    }

    fn create_buffer(&mut self, vertices: &[Vertex]) -> Result<GpuBufferId, BackendError> {
        let bytes = vertices.len() * Vertex::STRIDE_BYTES;
        self.reserve(bytes)?;
        let id = GpuBufferId(self.next_id());
        self.buffers.insert(id, vertices.len());
        self.calls.push(BackendCall::CreateBuffer { id, vertex_count: vertices.len() });
        Ok(id)
    }

    fn write_buffer(&mut self, id: GpuBufferId, vertices: &[Vertex]) -> Result<(), BackendError> {
        let expected = *self
            .buffers
            .get(&id)
            .ok_or(BackendError::InvalidResource(GpuResource::Buffer(id)))?;
        if vertices.len() != expected {
            return Err(BackendError::SizeMismatch {
                expected: expected * Vertex::STRIDE_BYTES,
                actual: vertices.len() * Vertex::STRIDE_BYTES,
            });
        }
        self.calls.push(BackendCall::WriteBuffer { id, vertex_count: vertices.len() });
        Ok(())
    }

    fn destroy(&mut self, resource: GpuResource) -> Result<(), BackendError> {
        let freed = match resource {
            GpuResource::Texture(id) => self.textures.remove(&id),
            GpuResource::Buffer(id) => self
                .buffers
                .remove(&id)
                .map(|count| count * Vertex::STRIDE_BYTES),
        };
        let bytes = freed.ok_or(BackendError::InvalidResource(resource))?;
        self.memory_used = self.memory_used.saturating_sub(bytes);
        self.calls.push(BackendCall::Destroy(resource));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BackendError> {
        self.calls.push(BackendCall::SetViewport(viewport));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<(), BackendError> {
        self.calls.push(BackendCall::Clear(color));
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), BackendError> {
        if !self.buffers.contains_key(&call.buffer) {
            return Err(BackendError::InvalidResource(GpuResource::Buffer(call.buffer)));
        }
        if let Some(texture) = call.texture {
            if !self.textures.contains_key(&texture) {
                return Err(BackendError::InvalidResource(GpuResource::Texture(texture)));
            }
            if self.rejected_textures.contains(&texture) {
                return Err(BackendError::Rejected(format!("texture {} is poisoned", texture.0)));
            }
        }
        self.calls.push(BackendCall::Draw(*call));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::texture::{PixelFormat, TextureConfig};

    fn desc(width: u32, height: u32) -> TextureDesc {
        TextureDesc { width, height, format: PixelFormat::Rgba8, config: TextureConfig::default() }
    }

    #[test]
    fn tracks_live_objects_and_memory() {
        let mut gpu = RecordingBackend::new();
        let tex = gpu.create_texture(&desc(2, 2), &[0u8; 16]).unwrap();
        let buf = gpu.create_buffer(&[Vertex::default(); 3]).unwrap();
        assert_eq!(gpu.memory_used(), 16 + 3 * Vertex::STRIDE_BYTES);

        gpu.destroy(GpuResource::Texture(tex)).unwrap();
        gpu.destroy(GpuResource::Buffer(buf)).unwrap();
        assert_eq!(gpu.memory_used(), 0);
        assert_eq!(gpu.live_textures(), 0);
        assert_eq!(gpu.destroyed(), 2);
    }

    #[test]
    fn budget_rejects_oversized_allocation() {
        let mut gpu = RecordingBackend::with_memory_budget(10);
        let err = gpu.create_texture(&desc(2, 2), &[0u8; 16]).unwrap_err();
        assert_eq!(err, BackendError::OutOfMemory { requested: 16, available: 10 });
        assert_eq!(gpu.live_textures(), 0);
    }

    #[test]
    fn destroying_unknown_object_fails() {
        let mut gpu = RecordingBackend::new();
        let res = GpuResource::Texture(GpuTextureId(42));
        assert_eq!(gpu.destroy(res), Err(BackendError::InvalidResource(res)));
    }

    #[test]
    fn write_texture_requires_matching_size() {
        let mut gpu = RecordingBackend::new();
        let tex = gpu.create_texture(&desc(1, 1), &[0u8; 4]).unwrap();
        assert!(gpu.write_texture(tex, &[1u8; 4]).is_ok());
        assert!(matches!(
            gpu.write_texture(tex, &[1u8; 8]),
            Err(BackendError::SizeMismatch { expected: 4, actual: 8 })
        ));
    }
}
