//! GPU vertex buffer allocation.
//!
//! Same contract as the texture allocator: generational handles, a recycle
//! pool keyed by vertex count, `DoubleFree` on stale handles.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;

use slotmap::{new_key_type, SlotMap};

use super::texture_allocator::upload_error;
use crate::error::{EngineError, EngineResult};
use crate::renderer::backend::{GpuBackend, GpuBufferId, GpuResource};
use crate::renderer::vertex::Vertex;

new_key_type! {
    /// Generational handle to an allocated mesh. Stale after `free`.
    pub struct MeshHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    pub gpu: GpuBufferId,
    pub vertex_count: u32,
    pub content_hash: u64,
}

/// Hash of the raw vertex bytes. Identical geometry hashes identically.
pub fn content_hash(vertices: &[Vertex]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytemuck::cast_slice(vertices));
    hasher.finish()
}

pub struct MeshAllocator {
    meshes: SlotMap<MeshHandle, Mesh>,
    pool: HashMap<u32, Vec<GpuBufferId>>,
    pool_limit: usize,
    created: usize,
    reused: usize,
}

impl MeshAllocator {
    pub fn new(pool_limit: usize) -> Self {
        Self {
            meshes: SlotMap::with_key(),
            pool: HashMap::new(),
            pool_limit,
            created: 0,
            reused: 0,
        }
    }

    pub fn allocate(&mut self, gpu: &mut dyn GpuBackend, vertices: &[Vertex]) -> EngineResult<MeshHandle> {
        if vertices.is_empty() {
            return Err(EngineError::LoadError {
                path: "<mesh>".to_string(),
                reason: "mesh has no vertices".to_string(),
            });
        }
        let vertex_count = vertices.len() as u32;

        let gpu_id = match self.take_pooled(gpu, vertex_count, vertices) {
            Some(id) => {
                self.reused += 1;
                id
            }
            None => {
                let id = gpu
                    .create_buffer(vertices)
                    .map_err(|e| upload_error("<mesh>", e))?;
                self.created += 1;
                id
            }
        };

        Ok(self.meshes.insert(Mesh {
            gpu: gpu_id,
            vertex_count,
            content_hash: content_hash(vertices),
        }))
    }

    fn take_pooled(&mut self, gpu: &mut dyn GpuBackend, vertex_count: u32, vertices: &[Vertex]) -> Option<GpuBufferId> {
        let id = self.pool.get_mut(&vertex_count)?.pop()?;
        match gpu.write_buffer(id, vertices) {
            Ok(()) => Some(id),
            Err(e) => {
                log::warn!("pooled buffer {} rejected rewrite ({}), discarding it", id.0, e);
                if let Err(e) = gpu.destroy(GpuResource::Buffer(id)) {
                    log::warn!("failed to destroy buffer {}: {}", id.0, e);
                }
                None
            }
        }
    }

    pub fn free(&mut self, gpu: &mut dyn GpuBackend, handle: MeshHandle) -> EngineResult<()> {
        let mesh = self.meshes.remove(handle).ok_or(EngineError::DoubleFree)?;
        let parked = self.pool.entry(mesh.vertex_count).or_default();
        if parked.len() < self.pool_limit {
            parked.push(mesh.gpu);
        } else if let Err(e) = gpu.destroy(GpuResource::Buffer(mesh.gpu)) {
            log::warn!("failed to destroy buffer {}: {}", mesh.gpu.0, e);
        }
        Ok(())
    }

    pub fn get(&self, handle: MeshHandle) -> EngineResult<&Mesh> {
        self.meshes.get(handle).ok_or(EngineError::ResourceNotFound)
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn pooled(&self) -> usize {
        self.pool.values().map(Vec::len).sum()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn reused(&self) -> usize {
        self.reused
    }

    pub fn trim(&mut self, gpu: &mut dyn GpuBackend) {
        for (_, ids) in self.pool.drain() {
            for id in ids {
                if let Err(e) = gpu.destroy(GpuResource::Buffer(id)) {
                    log::warn!("failed to destroy pooled buffer {}: {}", id.0, e);
                }
            }
        }
    }

    pub fn clear(&mut self, gpu: &mut dyn GpuBackend) {
        for (_, mesh) in self.meshes.drain() {
            if let Err(e) = gpu.destroy(GpuResource::Buffer(mesh.gpu)) {
                log::warn!("failed to destroy buffer {}: {}", mesh.gpu.0, e);
            }
        }
        self.trim(gpu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::headless::RecordingBackend;
    use crate::renderer::vertex::QUAD_VERTICES;

    #[test]
    fn hash_depends_on_content() {
        let mut moved = QUAD_VERTICES;
        moved[0].x += 1.0;
        assert_eq!(content_hash(&QUAD_VERTICES), content_hash(&QUAD_VERTICES));
        assert_ne!(content_hash(&QUAD_VERTICES), content_hash(&moved));
    }

    #[test]
    fn allocate_free_reuse() {
        let mut gpu = RecordingBackend::new();
        let mut meshes = MeshAllocator::new(4);
        let quad = meshes.allocate(&mut gpu, &QUAD_VERTICES).unwrap();
        let buffer = meshes.get(quad).unwrap().gpu;
        assert_eq!(meshes.get(quad).unwrap().vertex_count, 6);

        meshes.free(&mut gpu, quad).unwrap();
        assert!(matches!(meshes.free(&mut gpu, quad), Err(EngineError::DoubleFree)));

        let again = meshes.allocate(&mut gpu, &QUAD_VERTICES).unwrap();
        assert_eq!(meshes.get(again).unwrap().gpu, buffer);
        assert_eq!(gpu.buffer_creations(), 1);
        assert_eq!(meshes.reused(), 1);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut gpu = RecordingBackend::new();
        let mut meshes = MeshAllocator::new(4);
        assert!(meshes.allocate(&mut gpu, &[]).is_err());
        assert_eq!(gpu.buffer_creations(), 0);
    }

    #[test]
    fn zero_pool_limit_destroys_immediately() {
        let mut gpu = RecordingBackend::new();
        let mut meshes = MeshAllocator::new(0);
        let quad = meshes.allocate(&mut gpu, &QUAD_VERTICES).unwrap();
        meshes.free(&mut gpu, quad).unwrap();
        assert_eq!(meshes.pooled(), 0);
        assert_eq!(gpu.live_buffers(), 0);
    }
}
