use crate::api::engine::EngineContext;
use crate::components::RenderContext;
use crate::error::{EngineError, EngineResult};
use crate::renderer::backend::GpuBackend;

/// A named phase of the application (splash, menu, level...).
///
/// The state machine owns every registered scene and keeps exactly one of
/// them active. Objects a scene spawns into `ctx.objects` are disposed
/// automatically after its `on_exit`; resources the scene loaded itself
/// must be released there.
pub trait Scene {
    fn name(&self) -> &str;

    /// Build the scene: load resources, spawn objects, schedule tasks.
    fn on_enter(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend) -> EngineResult<()>;

    /// Release scene-owned resources. Runs before the next scene's `on_enter`.
    fn on_exit(&mut self, _ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) {}

    /// Per-frame scene logic, after the scene's objects have updated.
    fn on_update(&mut self, _ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend, _dt: f32) {}

    /// Extra draws on top of the objects' own.
    fn on_render(&self, _rc: &mut RenderContext<'_>) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    Name(String),
    Index(usize),
}

/// A requested scene change, applied at the end of the frame.
///
/// A later request replaces an earlier one until the frame boundary.
#[derive(Debug, Default)]
pub struct TransitionRequest {
    pending: Option<SceneTarget>,
}

impl TransitionRequest {
    pub fn request(&mut self, name: impl Into<String>) {
        self.pending = Some(SceneTarget::Name(name.into()));
    }

    pub fn request_index(&mut self, index: usize) {
        self.pending = Some(SceneTarget::Index(index));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&SceneTarget> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<SceneTarget> {
        self.pending.take()
    }
}

/// Registered scenes plus the index of the active one.
#[derive(Default)]
pub struct SceneStateMachine {
    scenes: Vec<Box<dyn Scene>>,
    current: Option<usize>,
}

impl std::fmt::Debug for SceneStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStateMachine")
            .field("scenes", &self.scenes.iter().map(|s| s.name().to_string()).collect::<Vec<_>>())
            .field("current", &self.current_name())
            .finish()
    }
}

impl SceneStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene. Names must be unique. Returns its index.
    pub fn add_scene(&mut self, scene: Box<dyn Scene>) -> EngineResult<usize> {
        if self.index_of(scene.name()).is_some() {
            return Err(EngineError::SceneAlreadyExists(scene.name().to_string()));
        }
        self.scenes.push(scene);
        Ok(self.scenes.len() - 1)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.name() == name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.map(|i| self.scenes[i].name())
    }

    fn resolve(&self, target: &SceneTarget) -> EngineResult<usize> {
        match target {
            SceneTarget::Name(name) => self
                .index_of(name)
                .ok_or_else(|| EngineError::SceneNotFound(format!("'{}'", name))),
            SceneTarget::Index(i) if *i < self.scenes.len() => Ok(*i),
            SceneTarget::Index(i) => Err(EngineError::SceneNotFound(format!("index {}", i))),
        }
    }

    /// Switch scenes immediately. Only call between frames.
    pub fn load_now(
        &mut self,
        target: SceneTarget,
        ctx: &mut EngineContext,
        gpu: &mut dyn GpuBackend,
    ) -> EngineResult<()> {
        let next = self.resolve(&target)?;
        self.exit_current(ctx, gpu);

        log::info!("scene: entering '{}'", self.scenes[next].name());
        self.current = Some(next);
        self.scenes[next].on_enter(ctx, gpu)
    }

    /// Apply the pending transition, if any. Called at the frame boundary.
    /// An unknown target is dropped and reported; the current scene stays.
    pub fn apply_pending(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend) -> EngineResult<bool> {
        let Some(target) = ctx.transitions.take() else {
            return Ok(false);
        };
        self.load_now(target, ctx, gpu)?;
        Ok(true)
    }

    pub fn update(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend, dt: f32) {
        if let Some(i) = self.current {
            self.scenes[i].on_update(ctx, gpu, dt);
        }
    }

    pub fn render(&self, rc: &mut RenderContext<'_>) {
        if let Some(i) = self.current {
            self.scenes[i].on_render(rc);
        }
    }

    fn exit_current(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend) {
        let Some(old) = self.current.take() else { return };
        log::info!("scene: leaving '{}'", self.scenes[old].name());
        self.scenes[old].on_exit(ctx, gpu);
        ctx.objects.dispose(&mut ctx.resources, &mut ctx.audio);
        ctx.scheduler.clear();
    }

    /// Exit the active scene and clear its objects and tasks.
    pub fn dispose(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend) {
        self.exit_current(ctx, gpu);
        ctx.transitions.cancel();
    }
}
