use std::mem;

use crate::api::config::EngineConfig;
use crate::api::types::{AudioCommand, GameEvent, ObjectId};
use crate::assets::manager::ResourceManagementSystem;
use crate::assets::source::AssetSource;
use crate::components::{AudioSource, RenderContext, Services};
use crate::core::collection::GameObjectCollection;
use crate::core::scene::{Scene, SceneStateMachine, SceneTarget, TransitionRequest};
use crate::core::scheduler::{Scheduler, TaskContext};
use crate::core::time::FrameClock;
use crate::error::{EngineError, EngineResult};
use crate::input::{InputEvent, InputQueue, InputState};
use crate::renderer::backend::{GpuBackend, Viewport};
use crate::renderer::camera::Camera;
use crate::renderer::graphics::Graphics;
use crate::renderer::pipeline::{FrameStats, Renderer};

/// Engine state shared by scenes, lent to them on every hook.
pub struct EngineContext {
    pub objects: GameObjectCollection,
    pub resources: ResourceManagementSystem,
    pub renderer: Renderer,
    pub camera: Camera,
    pub input: InputState,
    pub scheduler: Scheduler,
    pub transitions: TransitionRequest,
    /// Game events emitted this frame, handed to the host in the `FrameReport`.
    pub events: Vec<GameEvent>,
    /// Audio commands emitted this frame, handed to the host in the `FrameReport`.
    pub audio: Vec<AudioCommand>,
}

impl EngineContext {
    pub fn new(config: &EngineConfig, source: Box<dyn AssetSource>) -> Self {
        Self {
            objects: GameObjectCollection::new(),
            resources: ResourceManagementSystem::new(
                source,
                config.frames_in_flight,
                config.texture_pool_limit,
                config.mesh_pool_limit,
            ),
            renderer: Renderer::new(
                Viewport::new(config.viewport_width, config.viewport_height),
                config.clear_color,
            ),
            camera: Camera::new(config.camera, config.viewport_width, config.viewport_height),
            input: InputState::new(),
            scheduler: Scheduler::new(),
            transitions: TransitionRequest::default(),
            events: Vec::new(),
            audio: Vec::new(),
        }
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn emit_audio(&mut self, command: AudioCommand) {
        self.audio.push(command);
    }

    /// Switch to `name` at the end of this frame.
    pub fn request_scene(&mut self, name: impl Into<String>) {
        self.transitions.request(name);
    }

    fn run_scheduler(&mut self, dt: f32) {
        let mut tasks = TaskContext {
            objects: &mut self.objects,
            transitions: &mut self.transitions,
            events: &mut self.events,
        };
        self.scheduler.update(dt, &mut tasks);
    }

    fn update_objects(&mut self, gpu: &mut dyn GpuBackend, dt: f32) {
        let mut services = Services {
            input: &self.input,
            resources: &mut self.resources,
            gpu,
            events: &mut self.events,
            audio: &mut self.audio,
        };
        self.objects.update(dt, &mut services);
    }

    fn apply_resize(&mut self, events: &[InputEvent]) {
        let last = events.iter().rev().find_map(|e| match *e {
            InputEvent::Resize { width, height } => Some((width, height)),
            _ => None,
        });
        if let Some((width, height)) = last {
            log::debug!("viewport resized to {}x{}", width, height);
            self.camera.recalculate(width, height);
            self.renderer.set_viewport(Viewport::new(width.max(1), height.max(1)));
        }
    }
}

/// What one tick produced, for the host to act on.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// Clamped delta the frame ran with.
    pub dt: f32,
    pub stats: FrameStats,
    pub objects_removed: usize,
    /// A scene transition was applied at the end of this frame.
    pub scene_changed: bool,
    pub events: Vec<GameEvent>,
    pub audio: Vec<AudioCommand>,
}

/// The frame loop: owns the backend, the engine context and the scenes.
///
/// Per tick: input snapshot, object start/update, scheduled tasks (which
/// see the events objects emitted this frame), scene update, render and
/// flush, deferred object removal, pending scene transition, deferred
/// resource free.
pub struct Engine<B: GpuBackend> {
    config: EngineConfig,
    backend: B,
    ctx: EngineContext,
    scenes: SceneStateMachine,
    clock: FrameClock,
    input: InputQueue,
}

impl<B: GpuBackend> Engine<B> {
    pub fn new(config: EngineConfig, backend: B, source: Box<dyn AssetSource>) -> EngineResult<Self> {
        config.validate()?;
        log::info!(
            "engine: {}x{} on '{}' backend",
            config.viewport_width,
            config.viewport_height,
            backend.name()
        );
        Ok(Self {
            ctx: EngineContext::new(&config, source),
            clock: FrameClock::new(config.max_frame_dt, config.target_fps),
            scenes: SceneStateMachine::new(),
            input: InputQueue::new(),
            config,
            backend,
        })
    }

    pub fn add_scene(&mut self, scene: impl Scene + 'static) -> EngineResult<usize> {
        self.scenes.add_scene(Box::new(scene))
    }

    /// Enter the configured initial scene, or the first registered one.
    pub fn start(&mut self) -> EngineResult<()> {
        let target = match &self.config.initial_scene {
            Some(name) => SceneTarget::Name(name.clone()),
            None if !self.scenes.is_empty() => SceneTarget::Index(0),
            None => return Err(EngineError::SceneNotFound("no scenes registered".into())),
        };
        self.scenes.load_now(target, &mut self.ctx, &mut self.backend)
    }

    /// Queue a platform event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame with `raw_dt` seconds of elapsed time.
    ///
    /// Errors only come from a failed scene transition; the frame itself
    /// has completed by then.
    pub fn tick(&mut self, raw_dt: f32) -> EngineResult<FrameReport> {
        let dt = self.clock.advance(raw_dt);
        let ctx = &mut self.ctx;

        let events = self.input.drain();
        ctx.apply_resize(&events);
        ctx.input.begin_frame(&events, &ctx.camera);

        ctx.update_objects(&mut self.backend, dt);
        ctx.run_scheduler(dt);
        self.scenes.update(ctx, &mut self.backend, dt);

        ctx.renderer.begin_frame(&ctx.camera);
        {
            let mut rc = RenderContext {
                graphics: Graphics::new(&mut ctx.renderer),
                resources: &ctx.resources,
            };
            ctx.objects.render(&mut rc);
            self.scenes.render(&mut rc);
        }
        let stats = ctx.renderer.flush(&mut self.backend, &ctx.resources);

        let objects_removed = ctx.objects.end_frame(&mut ctx.resources, &mut ctx.audio);
        let transition = self.scenes.apply_pending(ctx, &mut self.backend);
        ctx.resources.end_frame(&mut self.backend);

        let report = FrameReport {
            frame: self.clock.frame(),
            dt,
            stats,
            objects_removed,
            scene_changed: false,
            events: mem::take(&mut ctx.events),
            audio: mem::take(&mut ctx.audio),
        };
        Ok(FrameReport {
            scene_changed: transition?,
            ..report
        })
    }

    /// The host reports that a clip started by `source` finished playing.
    pub fn notify_audio_finished(&mut self, source: ObjectId) {
        if let Some(audio) = self
            .ctx
            .objects
            .get_mut(source)
            .and_then(|o| o.get_mut::<AudioSource>())
        {
            audio.mark_finished();
        }
    }

    /// Exit the active scene and free every GPU resource.
    pub fn shutdown(&mut self) {
        self.scenes.dispose(&mut self.ctx, &mut self.backend);
        self.ctx.renderer.discard();
        self.ctx.resources.shutdown(&mut self.backend);
        log::info!("engine: shut down after {} frames", self.clock.frame());
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn current_scene(&self) -> Option<&str> {
        self.scenes.current_name()
    }
}
