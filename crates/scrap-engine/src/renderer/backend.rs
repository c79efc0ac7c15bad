//! GPU backend capability trait.
//!
//! The engine never talks to a graphics API directly. Allocators upload
//! through this trait and the renderer submits fully resolved draw calls
//! through it. A backend may be OpenGL, wgpu, Metal or the headless
//! [`RecordingBackend`](super::headless::RecordingBackend) used by tests.

use glam::Mat4;
use thiserror::Error;

use super::vertex::Vertex;
use crate::assets::texture::{PixelFormat, TextureConfig};
use crate::components::sprite::BlendMode;

/// Backend-side texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuTextureId(pub u32);

/// Backend-side vertex buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuBufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    Texture(GpuTextureId),
    Buffer(GpuBufferId),
}

/// Pixel rectangle the backend rasterizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Everything a backend needs to create a texture object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub config: TextureConfig,
}

impl TextureDesc {
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// A fully resolved draw: handles already mapped to backend objects and the
/// model/view-projection matrices computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub buffer: GpuBufferId,
    pub vertex_count: u32,
    /// `None` draws untextured with the tint as a flat color.
    pub texture: Option<GpuTextureId>,
    pub model: Mat4,
    pub view_projection: Mat4,
    pub tint: [f32; 4],
    /// Sub-rectangle of the texture in UV space: (u, v, width, height).
    pub uv_rect: [f32; 4],
    pub blend: BlendMode,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("out of GPU memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    #[error("unknown GPU resource {0:?}")]
    InvalidResource(GpuResource),

    #[error("pixel data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("command rejected: {0}")]
    Rejected(String),
}

/// Capability set the engine requires from a graphics backend.
///
/// Every operation reports success or failure; the engine decides whether a
/// failure is propagated (uploads) or logged and skipped (draws).
pub trait GpuBackend {
    /// Backend identifier (e.g., "opengl", "wgpu", "headless")
    fn name(&self) -> &'static str;

    /// Create a texture object and upload its initial pixels.
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8]) -> Result<GpuTextureId, BackendError>;

    /// Overwrite the full contents of an existing texture of the same shape.
    fn write_texture(&mut self, id: GpuTextureId, pixels: &[u8]) -> Result<(), BackendError>;

    /// Create a vertex buffer object and upload its vertices.
    fn create_buffer(&mut self, vertices: &[Vertex]) -> Result<GpuBufferId, BackendError>;

    /// Overwrite the contents of an existing buffer with the same vertex count.
    fn write_buffer(&mut self, id: GpuBufferId, vertices: &[Vertex]) -> Result<(), BackendError>;

    /// Release a texture or buffer object.
    fn destroy(&mut self, resource: GpuResource) -> Result<(), BackendError>;

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), BackendError>;

    fn clear(&mut self, color: [f32; 4]) -> Result<(), BackendError>;

    fn draw(&mut self, call: &DrawCall) -> Result<(), BackendError>;
}
