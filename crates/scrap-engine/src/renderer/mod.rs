pub mod backend;
pub mod camera;
pub mod command;
pub mod graphics;
pub mod headless;
pub mod pipeline;
pub mod vertex;

// Re-export key types for convenient access
pub use backend::{BackendError, DrawCall, GpuBackend, GpuBufferId, GpuResource, GpuTextureId, TextureDesc, Viewport};
pub use camera::{Camera, CameraConfig};
pub use command::{BatchKey, DrawCommand, RenderParams};
pub use graphics::Graphics;
pub use headless::{BackendCall, RecordingBackend};
pub use pipeline::{FrameStats, Renderer};
pub use vertex::{Vertex, QUAD_VERTICES};
