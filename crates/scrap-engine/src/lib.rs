pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::engine::{Engine, EngineContext, FrameReport};
pub use api::types::{AudioCommand, GameEvent, ObjectId};
pub use assets::font::{Font, FontConfig, FontHandle};
pub use assets::manager::{ResourceHandle, ResourceManagementSystem, ResourceManager};
pub use assets::manifest::{AssetManifest, SoundDescriptor};
pub use assets::mesh_allocator::MeshHandle;
pub use assets::source::{AssetSource, DirectorySource, MemoryAssets};
pub use assets::texture::{FilterMode, TextureConfig, WrapMode};
pub use assets::texture_allocator::TextureHandle;
pub use components::{
    AudioSource, BlendMode, Button, ButtonEvent, ComponentKind, GameObject, Phase, RenderLayer, SpriteRenderer,
    Text, TextAlign, Transform, Tween, TweenComponent, TweenLoop,
};
pub use crate::core::collection::GameObjectCollection;
pub use crate::core::scene::{Scene, SceneStateMachine, SceneTarget};
pub use crate::core::scheduler::{Scheduler, TaskContext, TaskStatus};
pub use error::{EngineError, EngineResult};
pub use extensions::{ease, Easing, Signal};
pub use input::{keys, InputEvent, InputState};
pub use renderer::backend::{GpuBackend, Viewport};
pub use renderer::camera::{Camera, CameraConfig};
pub use renderer::headless::RecordingBackend;
pub use renderer::pipeline::Renderer;
