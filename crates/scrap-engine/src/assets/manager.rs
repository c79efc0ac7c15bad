//! Reference-counted resource cache.
//!
//! Every load goes through here. A resource is keyed by what was asked for
//! (path + config for textures and fonts, vertex content for meshes), so
//! asking twice returns the same handle and bumps a reference count.
//! Releasing the last reference does not free GPU memory immediately: the
//! handle is parked until `frames_in_flight` frames have ended, so draws
//! already submitted for the current frame stay valid.

use std::collections::HashMap;

use super::font::{Font, FontConfig, FontHandle};
use super::manifest::{AssetManifest, SoundDescriptor};
use super::mesh_allocator::{content_hash, Mesh, MeshAllocator, MeshHandle};
use super::source::AssetSource;
use super::texture::{TextureConfig, TextureData};
use super::texture_allocator::{Texture2D, TextureAllocator, TextureHandle};
use crate::error::{EngineError, EngineResult};
use crate::renderer::backend::GpuBackend;
use crate::renderer::vertex::{Vertex, QUAD_VERTICES};

use slotmap::SlotMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceHandle {
    Texture(TextureHandle),
    Mesh(MeshHandle),
    Font(FontHandle),
}

impl From<TextureHandle> for ResourceHandle {
    fn from(handle: TextureHandle) -> Self {
        ResourceHandle::Texture(handle)
    }
}

impl From<MeshHandle> for ResourceHandle {
    fn from(handle: MeshHandle) -> Self {
        ResourceHandle::Mesh(handle)
    }
}

impl From<FontHandle> for ResourceHandle {
    fn from(handle: FontHandle) -> Self {
        ResourceHandle::Font(handle)
    }
}

/// What to load.
#[derive(Debug, Clone, Copy)]
pub enum LoadRequest<'a> {
    Texture { path: &'a str, config: TextureConfig },
    Mesh { vertices: &'a [Vertex] },
    Font { path: &'a str, config: FontConfig },
    /// 1x1 opaque white texture, used when a real texture is unavailable.
    BlankTexture,
}

/// Borrowed view of a loaded resource.
#[derive(Debug, Clone, Copy)]
pub enum ResourceView<'a> {
    Texture(&'a Texture2D),
    Mesh(&'a Mesh),
    Font(&'a Font),
}

/// Load/release contract shared by resource managers.
pub trait ResourceManager {
    /// Return a cached handle (reference count + 1) or load a new resource
    /// with a reference count of one. Failures leave the cache untouched.
    fn load(&mut self, gpu: &mut dyn GpuBackend, request: LoadRequest<'_>) -> EngineResult<ResourceHandle>;

    /// Drop one reference. The resource is freed once no references remain
    /// and no in-flight frame can still use it.
    fn release(&mut self, handle: ResourceHandle) -> EngineResult<()>;

    fn get(&self, handle: ResourceHandle) -> EngineResult<ResourceView<'_>>;

    /// Free everything that is waiting for deferred release, immediately.
    fn garbage_collect(&mut self, gpu: &mut dyn GpuBackend);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ResourceKey {
    Texture { path: String, config: TextureConfig },
    Mesh { hash: u64, vertex_count: usize },
    Font { path: String, config: FontConfig },
    Blank,
}

#[derive(Debug)]
struct CacheEntry {
    handle: ResourceHandle,
    refs: u32,
}

#[derive(Debug)]
struct PendingFree {
    handle: ResourceHandle,
    key: ResourceKey,
    released_at: u64,
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub cached: usize,
    pub pending_free: usize,
    pub textures: usize,
    pub meshes: usize,
    pub fonts: usize,
}

/// Handles produced by [`ResourceManagementSystem::preload`], by manifest name.
#[derive(Debug, Clone, Default)]
pub struct Preloaded {
    pub textures: HashMap<String, TextureHandle>,
    pub fonts: HashMap<String, FontHandle>,
    /// Sound entries are not GPU resources; they are carried for the host.
    pub sounds: HashMap<String, SoundDescriptor>,
}

impl Preloaded {
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.textures
            .values()
            .map(|&h| ResourceHandle::from(h))
            .chain(self.fonts.values().map(|&h| ResourceHandle::from(h)))
    }
}

pub struct ResourceManagementSystem {
    source: Box<dyn AssetSource>,
    textures: TextureAllocator,
    meshes: MeshAllocator,
    fonts: SlotMap<FontHandle, Font>,
    cache: HashMap<ResourceKey, CacheEntry>,
    keys: HashMap<ResourceHandle, ResourceKey>,
    pending_free: Vec<PendingFree>,
    frame: u64,
    frames_in_flight: u64,
}

impl ResourceManagementSystem {
    pub fn new(
        source: Box<dyn AssetSource>,
        frames_in_flight: u32,
        texture_pool_limit: usize,
        mesh_pool_limit: usize,
    ) -> Self {
        Self {
            source,
            textures: TextureAllocator::new(texture_pool_limit),
            meshes: MeshAllocator::new(mesh_pool_limit),
            fonts: SlotMap::with_key(),
            cache: HashMap::new(),
            keys: HashMap::new(),
            pending_free: Vec::new(),
            frame: 0,
            frames_in_flight: frames_in_flight as u64,
        }
    }

    pub fn load_texture(
        &mut self,
        gpu: &mut dyn GpuBackend,
        path: &str,
        config: TextureConfig,
    ) -> EngineResult<TextureHandle> {
        let key = ResourceKey::Texture { path: path.to_string(), config };
        if let Some(ResourceHandle::Texture(handle)) = self.acquire_cached(&key) {
            return Ok(handle);
        }
        let bytes = self.source.read(path).map_err(|e| EngineError::LoadError {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let data = TextureData::decode(path, &bytes)?;
        let handle = self.textures.allocate(gpu, &data, config, path)?;
        self.insert(key, handle.into());
        log::info!("loaded texture '{}' ({}x{} {:?})", path, data.width, data.height, data.format);
        Ok(handle)
    }

    /// Shared 1x1 white texture. Counted like any other resource.
    pub fn blank_texture(&mut self, gpu: &mut dyn GpuBackend) -> EngineResult<TextureHandle> {
        if let Some(ResourceHandle::Texture(handle)) = self.acquire_cached(&ResourceKey::Blank) {
            return Ok(handle);
        }
        let data = TextureData::solid(1, 1, [255, 255, 255, 255]);
        let handle = self
            .textures
            .allocate(gpu, &data, TextureConfig::default(), "<blank>")?;
        self.insert(ResourceKey::Blank, handle.into());
        Ok(handle)
    }

    /// Load `path`, falling back to the blank texture if it cannot be loaded.
    pub fn load_texture_or_blank(
        &mut self,
        gpu: &mut dyn GpuBackend,
        path: &str,
        config: TextureConfig,
    ) -> EngineResult<TextureHandle> {
        match self.load_texture(gpu, path, config) {
            Ok(handle) => Ok(handle),
            Err(e @ EngineError::OutOfMemory { .. }) => Err(e),
            Err(e) => {
                log::warn!("{}; using blank texture", e);
                self.blank_texture(gpu)
            }
        }
    }

    /// Upload a mesh, deduplicated by vertex content.
    pub fn load_mesh(&mut self, gpu: &mut dyn GpuBackend, vertices: &[Vertex]) -> EngineResult<MeshHandle> {
        let key = ResourceKey::Mesh {
            hash: content_hash(vertices),
            vertex_count: vertices.len(),
        };
        if let Some(ResourceHandle::Mesh(handle)) = self.acquire_cached(&key) {
            return Ok(handle);
        }
        let handle = self.meshes.allocate(gpu, vertices)?;
        self.insert(key, handle.into());
        Ok(handle)
    }

    /// The shared unit quad.
    pub fn quad(&mut self, gpu: &mut dyn GpuBackend) -> EngineResult<MeshHandle> {
        self.load_mesh(gpu, &QUAD_VERTICES)
    }

    pub fn load_font(&mut self, gpu: &mut dyn GpuBackend, path: &str, config: FontConfig) -> EngineResult<FontHandle> {
        if config.cell_count().is_none() {
            return Err(EngineError::LoadError {
                path: path.to_string(),
                reason: format!("font grid {}x{} is empty or too large", config.cols, config.rows),
            });
        }
        let key = ResourceKey::Font { path: path.to_string(), config };
        if let Some(ResourceHandle::Font(handle)) = self.acquire_cached(&key) {
            return Ok(handle);
        }
        let bytes = self.source.read(path).map_err(|e| EngineError::LoadError {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let data = TextureData::decode(path, &bytes)?;
        // The atlas belongs to the font and is freed with it.
        let texture = self
            .textures
            .allocate(gpu, &data, TextureConfig::pixel_art(), path)?;
        let font = Font::from_grid(texture, data.width, data.height, config);
        log::info!("loaded font '{}' ({} glyphs)", path, font.glyph_count());
        let handle = self.fonts.insert(font);
        self.insert(key, handle.into());
        Ok(handle)
    }

    /// Load every texture and font named in `manifest`.
    ///
    /// All-or-nothing: if one entry fails, the ones already loaded are released.
    pub fn preload(&mut self, gpu: &mut dyn GpuBackend, manifest: &AssetManifest) -> EngineResult<Preloaded> {
        let mut loaded = Preloaded::default();
        let result = self.preload_into(gpu, manifest, &mut loaded);
        if let Err(e) = result {
            for handle in loaded.handles().collect::<Vec<_>>() {
                if let Err(release_err) = self.release(handle) {
                    log::warn!("failed to roll back preload: {}", release_err);
                }
            }
            return Err(e);
        }
        Ok(loaded)
    }

    fn preload_into(
        &mut self,
        gpu: &mut dyn GpuBackend,
        manifest: &AssetManifest,
        loaded: &mut Preloaded,
    ) -> EngineResult<()> {
        let mut textures: Vec<_> = manifest.textures.iter().collect();
        textures.sort_by(|a, b| a.0.cmp(b.0));
        for (name, desc) in textures {
            let handle = self.load_texture(gpu, &desc.path, desc.config)?;
            loaded.textures.insert(name.clone(), handle);
        }
        let mut fonts: Vec<_> = manifest.fonts.iter().collect();
        fonts.sort_by(|a, b| a.0.cmp(b.0));
        for (name, desc) in fonts {
            let handle = self.load_font(gpu, &desc.path, desc.grid)?;
            loaded.fonts.insert(name.clone(), handle);
        }
        loaded.sounds = manifest.sounds.clone();
        Ok(())
    }

    fn acquire_cached(&mut self, key: &ResourceKey) -> Option<ResourceHandle> {
        if let Some(entry) = self.cache.get_mut(key) {
            entry.refs += 1;
            return Some(entry.handle);
        }
        // Released but not yet freed: bring it back instead of reloading.
        let index = self.pending_free.iter().position(|p| &p.key == key)?;
        let pending = self.pending_free.swap_remove(index);
        log::debug!("resurrected {:?} before deferred free", pending.key);
        self.insert(pending.key, pending.handle);
        Some(pending.handle)
    }

    fn insert(&mut self, key: ResourceKey, handle: ResourceHandle) {
        self.keys.insert(handle, key.clone());
        self.cache.insert(key, CacheEntry { handle, refs: 1 });
    }

    /// Current reference count; `None` once the last reference is gone.
    pub fn ref_count(&self, handle: ResourceHandle) -> Option<u32> {
        let key = self.keys.get(&handle)?;
        self.cache.get(key).map(|entry| entry.refs)
    }

    pub fn texture(&self, handle: TextureHandle) -> EngineResult<&Texture2D> {
        match self.get(handle.into())? {
            ResourceView::Texture(texture) => Ok(texture),
            _ => Err(EngineError::ResourceNotFound),
        }
    }

    pub fn mesh(&self, handle: MeshHandle) -> EngineResult<&Mesh> {
        match self.get(handle.into())? {
            ResourceView::Mesh(mesh) => Ok(mesh),
            _ => Err(EngineError::ResourceNotFound),
        }
    }

    pub fn font(&self, handle: FontHandle) -> EngineResult<&Font> {
        match self.get(handle.into())? {
            ResourceView::Font(font) => Ok(font),
            _ => Err(EngineError::ResourceNotFound),
        }
    }

    /// Allocator view used by the renderer. Resolves handles that were
    /// released this frame but are not yet freed.
    pub fn textures(&self) -> &TextureAllocator {
        &self.textures
    }

    pub fn meshes(&self) -> &MeshAllocator {
        &self.meshes
    }

    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            cached: self.cache.len(),
            pending_free: self.pending_free.len(),
            textures: self.textures.len(),
            meshes: self.meshes.len(),
            fonts: self.fonts.len(),
        }
    }

    /// Called once per frame after the renderer has flushed. Frees released
    /// resources whose last possible use is at least `frames_in_flight`
    /// frames old.
    pub fn end_frame(&mut self, gpu: &mut dyn GpuBackend) {
        let frame = self.frame;
        let delay = self.frames_in_flight;
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending_free
            .drain(..)
            .partition(|p| frame >= p.released_at + delay);
        self.pending_free = waiting;
        for pending in due {
            self.destroy(gpu, pending.handle);
        }
        self.frame += 1;
    }

    /// Free every resource, referenced or not. Used at engine shutdown.
    pub fn shutdown(&mut self, gpu: &mut dyn GpuBackend) {
        self.garbage_collect(gpu);
        let leaked: Vec<_> = self.cache.drain().map(|(_, entry)| entry).collect();
        if !leaked.is_empty() {
            log::warn!("{} resources still referenced at shutdown", leaked.len());
        }
        for entry in leaked {
            self.destroy(gpu, entry.handle);
        }
        self.keys.clear();
        self.fonts.clear();
        self.textures.clear(gpu);
        self.meshes.clear(gpu);
    }

    fn destroy(&mut self, gpu: &mut dyn GpuBackend, handle: ResourceHandle) {
        let result = match handle {
            ResourceHandle::Texture(h) => self.textures.free(gpu, h),
            ResourceHandle::Mesh(h) => self.meshes.free(gpu, h),
            ResourceHandle::Font(h) => match self.fonts.remove(h) {
                Some(font) => self.textures.free(gpu, font.texture),
                None => Err(EngineError::DoubleFree),
            },
        };
        match result {
            Ok(()) => {}
            Err(EngineError::DoubleFree) => {
                log::error!("double free of {:?}", handle);
                debug_assert!(false, "double free of {:?}", handle);
            }
            Err(e) => log::warn!("freeing {:?} failed: {}", handle, e),
        }
    }
}

impl ResourceManager for ResourceManagementSystem {
    fn load(&mut self, gpu: &mut dyn GpuBackend, request: LoadRequest<'_>) -> EngineResult<ResourceHandle> {
        Ok(match request {
            LoadRequest::Texture { path, config } => self.load_texture(gpu, path, config)?.into(),
            LoadRequest::Mesh { vertices } => self.load_mesh(gpu, vertices)?.into(),
            LoadRequest::Font { path, config } => self.load_font(gpu, path, config)?.into(),
            LoadRequest::BlankTexture => self.blank_texture(gpu)?.into(),
        })
    }

    fn release(&mut self, handle: ResourceHandle) -> EngineResult<()> {
        let key = self.keys.get(&handle).ok_or(EngineError::ResourceNotFound)?;
        let entry = self.cache.get_mut(key).ok_or(EngineError::ResourceNotFound)?;
        entry.refs -= 1;
        if entry.refs == 0 {
            let key = key.clone();
            self.cache.remove(&key);
            self.keys.remove(&handle);
            self.pending_free.push(PendingFree {
                handle,
                key,
                released_at: self.frame,
            });
        }
        Ok(())
    }

    fn get(&self, handle: ResourceHandle) -> EngineResult<ResourceView<'_>> {
        if !self.keys.contains_key(&handle) {
            return Err(EngineError::ResourceNotFound);
        }
        Ok(match handle {
            ResourceHandle::Texture(h) => ResourceView::Texture(self.textures.get(h)?),
            ResourceHandle::Mesh(h) => ResourceView::Mesh(self.meshes.get(h)?),
            ResourceHandle::Font(h) => {
                ResourceView::Font(self.fonts.get(h).ok_or(EngineError::ResourceNotFound)?)
            }
        })
    }

    fn garbage_collect(&mut self, gpu: &mut dyn GpuBackend) {
        let pending: Vec<_> = self.pending_free.drain(..).collect();
        let freed = pending.len();
        for p in pending {
            self.destroy(gpu, p.handle);
        }
        self.textures.trim(gpu);
        self.meshes.trim(gpu);
        if freed > 0 {
            log::debug!("garbage collected {} resources", freed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::source::MemoryAssets;
    use crate::renderer::headless::RecordingBackend;
    use crate::test_support::png;

    fn system(frames_in_flight: u32) -> ResourceManagementSystem {
        let assets = MemoryAssets::new()
            .with("logo.png", png(4, 4, [255, 0, 0, 255]))
            .with("bg.png", png(8, 8, [0, 0, 255, 255]))
            .with("font.png", png(32, 12, [255, 255, 255, 255]))
            .with("broken.png", b"garbage".to_vec());
        ResourceManagementSystem::new(Box::new(assets), frames_in_flight, 4, 4)
    }

    #[test]
    fn same_request_shares_handle() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let a = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        let b = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(res.ref_count(a.into()), Some(2));
        assert_eq!(gpu.texture_creations(), 1);
    }

    #[test]
    fn different_config_is_a_different_resource() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let a = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        let b = res.load_texture(&mut gpu, "logo.png", TextureConfig::pixel_art()).unwrap();
        assert_ne!(a, b);
        assert_eq!(gpu.texture_creations(), 2);
    }

    #[test]
    fn missing_path_leaves_cache_untouched() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let err = res
            .load_texture(&mut gpu, "nope.png", TextureConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::LoadError { ref path, .. } if path == "nope.png"));
        assert!(res.load_texture(&mut gpu, "broken.png", TextureConfig::default()).is_err());
        assert_eq!(res.stats(), ResourceStats::default());
        assert_eq!(gpu.texture_creations(), 0);
    }

    #[test]
    fn fallback_to_blank_texture() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let handle = res
            .load_texture_or_blank(&mut gpu, "nope.png", TextureConfig::default())
            .unwrap();
        let tex = res.texture(handle).unwrap();
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(res.blank_texture(&mut gpu).unwrap(), handle);
    }

    #[test]
    fn release_defers_free_by_frames_in_flight() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let handle = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        let gpu_id = res.texture(handle).unwrap().gpu;

        res.release(handle.into()).unwrap();
        assert_eq!(res.ref_count(handle.into()), None);
        assert!(matches!(res.get(handle.into()), Err(EngineError::ResourceNotFound)));
        // Still resolvable by the renderer for the in-flight frame.
        assert!(res.textures().contains(handle));

        res.end_frame(&mut gpu);
        assert!(res.textures().contains(handle));
        res.end_frame(&mut gpu);
        assert!(!res.textures().contains(handle));
        assert_eq!(res.stats().pending_free, 0);
        // The object went to the recycle pool rather than being destroyed.
        assert!(gpu.has_texture(gpu_id));
    }

    #[test]
    fn zero_frames_in_flight_frees_at_end_of_frame() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(0);
        let handle = res.quad(&mut gpu).unwrap();
        res.release(handle.into()).unwrap();
        res.end_frame(&mut gpu);
        assert!(!res.meshes().contains(handle));
    }

    #[test]
    fn reload_before_free_resurrects() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(2);
        let first = res.load_texture(&mut gpu, "bg.png", TextureConfig::default()).unwrap();
        res.release(first.into()).unwrap();
        res.end_frame(&mut gpu);

        let second = res.load_texture(&mut gpu, "bg.png", TextureConfig::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(res.ref_count(second.into()), Some(1));
        for _ in 0..4 {
            res.end_frame(&mut gpu);
        }
        assert!(res.texture(second).is_ok());
        assert_eq!(gpu.texture_creations(), 1);
    }

    #[test]
    fn releasing_unknown_handle_fails() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let handle = res.quad(&mut gpu).unwrap();
        res.release(handle.into()).unwrap();
        assert!(matches!(res.release(handle.into()), Err(EngineError::ResourceNotFound)));
    }

    #[test]
    fn meshes_deduplicate_by_content() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        let quad = res.quad(&mut gpu).unwrap();
        let same = res.load_mesh(&mut gpu, &QUAD_VERTICES).unwrap();
        let tri = res.load_mesh(&mut gpu, &QUAD_VERTICES[..3]).unwrap();
        assert_eq!(quad, same);
        assert_ne!(quad, tri);
        assert_eq!(gpu.buffer_creations(), 2);
        assert_eq!(res.mesh(tri).unwrap().vertex_count, 3);
    }

    #[test]
    fn font_owns_its_atlas() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(0);
        let config = FontConfig::default().with_grid(8, 3);
        let font = res.load_font(&mut gpu, "font.png", config).unwrap();
        let glyph_a = *res.font(font).unwrap().glyph('!').unwrap();
        assert_eq!(glyph_a.size.x, 4.0);
        assert_eq!(res.stats().textures, 1);

        res.release(font.into()).unwrap();
        res.end_frame(&mut gpu);
        assert_eq!(res.stats().textures, 0);
        assert_eq!(res.stats().fonts, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "double free")]
    fn destroying_a_freed_handle_asserts() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(0);
        let handle = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        res.destroy(&mut gpu, handle.into());
        res.destroy(&mut gpu, handle.into());
    }

    #[test]
    fn font_with_overflowing_grid_is_rejected() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(0);
        let config = FontConfig::default().with_grid(u32::MAX, 2);
        let err = res.load_font(&mut gpu, "font.png", config).unwrap_err();
        assert!(matches!(err, EngineError::LoadError { .. }));
        assert_eq!(res.stats().textures, 0);
        assert_eq!(gpu.texture_creations(), 0);
    }

    #[test]
    fn garbage_collect_frees_pending_and_pools() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(3);
        let handle = res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        res.release(handle.into()).unwrap();
        res.garbage_collect(&mut gpu);
        assert_eq!(res.stats().pending_free, 0);
        assert_eq!(gpu.live_textures(), 0);
    }

    #[test]
    fn out_of_memory_propagates() {
        let mut gpu = RecordingBackend::with_memory_budget(64);
        let mut res = system(1);
        let err = res
            .load_texture_or_blank(&mut gpu, "bg.png", TextureConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfMemory { .. }));
        assert_eq!(res.stats().cached, 0);
    }

    #[test]
    fn preload_is_all_or_nothing() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(0);
        let good = AssetManifest::from_json(
            r#"{ "textures": { "logo": { "path": "logo.png" } },
                 "fonts": { "ui": { "path": "font.png", "grid": { "cols": 8, "rows": 3 } } },
                 "sounds": { "click": { "path": "click.wav", "volume": 0.5 } } }"#,
        )
        .unwrap();
        let loaded = res.preload(&mut gpu, &good).unwrap();
        assert!(loaded.textures.contains_key("logo"));
        assert!(loaded.fonts.contains_key("ui"));
        assert_eq!(loaded.sounds["click"].path, "click.wav");
        assert_eq!(loaded.handles().count(), 2);

        let bad = AssetManifest::from_json(
            r#"{ "textures": { "a": { "path": "bg.png" }, "b": { "path": "missing.png" } } }"#,
        )
        .unwrap();
        assert!(res.preload(&mut gpu, &bad).is_err());
        res.end_frame(&mut gpu);
        // Only the first manifest's resources remain.
        assert_eq!(res.stats().cached, 2);
    }

    #[test]
    fn shutdown_frees_everything() {
        let mut gpu = RecordingBackend::new();
        let mut res = system(1);
        res.load_texture(&mut gpu, "logo.png", TextureConfig::default()).unwrap();
        res.quad(&mut gpu).unwrap();
        res.shutdown(&mut gpu);
        assert_eq!(gpu.live_textures(), 0);
        assert_eq!(gpu.live_buffers(), 0);
        assert_eq!(gpu.memory_used(), 0);
    }
}
