pub mod font;
pub mod manager;
pub mod manifest;
pub mod mesh_allocator;
pub mod source;
pub mod texture;
pub mod texture_allocator;

pub use font::{Font, FontConfig, FontHandle, Glyph};
pub use manager::{LoadRequest, Preloaded, ResourceHandle, ResourceManagementSystem, ResourceManager, ResourceStats, ResourceView};
pub use manifest::{AssetManifest, SoundDescriptor};
pub use mesh_allocator::{Mesh, MeshAllocator, MeshHandle};
pub use source::{AssetSource, DirectorySource, MemoryAssets};
pub use texture::{FilterMode, PixelFormat, TextureConfig, TextureData, WrapMode};
pub use texture_allocator::{Texture2D, TextureAllocator, TextureHandle};
