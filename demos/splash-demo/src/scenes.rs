use glam::{Vec2, Vec3};
use scrap_engine::assets::manager::Preloaded;
use scrap_engine::{
    keys, AssetManifest, AudioSource, Button, Easing, EngineContext, EngineResult, GameEvent, GpuBackend, ObjectId,
    RenderLayer, ResourceManager, Scene, SpriteRenderer, TaskStatus, Text, TextAlign, Tween, TweenComponent,
    TweenLoop,
};

use crate::assets::MANIFEST;

pub const PLAY_CLICKED: u32 = 1;
pub const SCORE: u32 = 2;

const SPLASH_TIME: f32 = 3.0;
const LOAD_TIME: f32 = 3.0;

#[derive(Default)]
pub struct SplashScene {
    elapsed: f32,
}

impl Scene for SplashScene {
    fn name(&self) -> &str {
        "Splash"
    }

    fn on_enter(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) -> EngineResult<()> {
        self.elapsed = 0.0;

        let logo = ctx
            .objects
            .create("logo")
            .with_position(Vec2::new(0.0, 0.3))
            .with(SpriteRenderer::new("logo.png").with_size(Vec2::splat(0.8)))?
            .with(TweenComponent::new().with(Tween::scale(Vec2::ZERO, Vec2::ONE, 2.0, Easing::CubicInOut)))?;
        ctx.objects.add(logo);

        let info = ctx
            .objects
            .create("info")
            .with_position(Vec2::new(0.0, -0.65))
            .with_scale(Vec2::new(1.5, 0.45))
            .with(SpriteRenderer::new("info.png"))?;
        ctx.objects.add(info);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend, dt: f32) {
        self.elapsed += dt;
        if ctx.input.key_pressed(keys::SPACE) || self.elapsed > SPLASH_TIME {
            ctx.request_scene("Load");
        }
    }
}

/// Preloads the menu and game assets behind a progress bar.
///
/// The preloaded handles are released on exit; the next scene picks the
/// same resources back up before they are freed.
#[derive(Default)]
pub struct LoadScene {
    elapsed: f32,
    bar: Option<ObjectId>,
    preloaded: Option<Preloaded>,
}

impl Scene for LoadScene {
    fn name(&self) -> &str {
        "Load"
    }

    fn on_enter(&mut self, ctx: &mut EngineContext, gpu: &mut dyn GpuBackend) -> EngineResult<()> {
        self.elapsed = 0.0;
        self.preloaded = Some(ctx.resources.preload(gpu, &AssetManifest::from_json(MANIFEST)?)?);

        let full = ctx.camera.half_extents() * 2.0;
        let bg = ctx.objects.create("background").with(
            SpriteRenderer::new("load_bg.png")
                .with_size(full)
                .with_layer(RenderLayer::Background),
        )?;
        ctx.objects.add(bg);

        let spinner = ctx
            .objects
            .create("spinner")
            .with_position(Vec2::new(0.0, 0.2))
            .with(SpriteRenderer::new("load_bar.png").with_size(Vec2::splat(0.3)))?
            .with(
                TweenComponent::new()
                    .with(Tween::rotation(0.0, 180.0, 1.0, Easing::BounceInOut).with_loop(TweenLoop::PingPong)),
            )?;
        ctx.objects.add(spinner);

        let bar = ctx
            .objects
            .create("progress")
            .with_position(Vec2::new(0.0, -0.4))
            .with_scale(Vec2::new(0.0, 1.0))
            .with(
                SpriteRenderer::new("load_bar.png")
                    .with_size(Vec2::new(full.x * 0.8, 0.05))
                    .with_layer(RenderLayer::UI),
            )?;
        self.bar = Some(ctx.objects.add(bar));
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) {
        if let Some(preloaded) = self.preloaded.take() {
            for handle in preloaded.handles() {
                if let Err(err) = ctx.resources.release(handle) {
                    log::warn!("load: releasing preloaded asset: {}", err);
                }
            }
        }
        self.bar = None;
    }

    fn on_update(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend, dt: f32) {
        self.elapsed += dt;
        let progress = (self.elapsed / LOAD_TIME).min(1.0);
        if let Some(bar) = self.bar.and_then(|id| ctx.objects.get_mut(id)) {
            bar.transform.scale.x = progress;
        }
        if progress >= 1.0 {
            ctx.request_scene("MainMenu");
        }
    }
}

pub struct MainMenuScene;

impl Scene for MainMenuScene {
    fn name(&self) -> &str {
        "MainMenu"
    }

    fn on_enter(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) -> EngineResult<()> {
        let title = ctx.objects.create("title").with_position(Vec2::new(0.0, 0.5)).with(
            Text::new("SCRAP DEMO", "font.png")
                .with_size(0.15)
                .with_align(TextAlign::Center)
                .with_color(Vec3::new(1.0, 0.85, 0.3)),
        )?;
        ctx.objects.add(title);

        let size = Vec2::new(0.6, 0.2);
        let mut button = Button::new(size).with_opacity(0.0).with_click_event(PLAY_CLICKED);
        button.on_click.connect(|event| log::info!("menu: play clicked at {:?}", event.pointer));
        let play = ctx
            .objects
            .create("play")
            .with_position(Vec2::new(0.0, -0.3))
            .with(SpriteRenderer::new("button.png").with_size(size).with_layer(RenderLayer::UI))?
            .with(button)?;
        let play = ctx.objects.add(play);

        let label = ctx.objects.create("play-label").with(
            Text::new("PLAY", "font.png")
                .with_size(0.1)
                .with_align(TextAlign::Center),
        )?;
        let label = ctx.objects.add(label);
        ctx.objects.set_parent(label, Some(play))?;

        let manifest = AssetManifest::from_json(MANIFEST)?;
        if let Some(sound) = manifest.sounds.get("music") {
            let music = ctx
                .objects
                .create("music")
                .with(AudioSource::from_descriptor(sound).looping().play_on_start())?;
            ctx.objects.add(music);
        }

        ctx.scheduler.add_repeating(|task, _| {
            if task.events.iter().any(|e| e.kind_id() == PLAY_CLICKED) {
                task.transitions.request("Game");
                TaskStatus::Done
            } else {
                TaskStatus::Continue
            }
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct GameScene {
    leader: Option<ObjectId>,
}

impl Scene for GameScene {
    fn name(&self) -> &str {
        "Game"
    }

    fn on_enter(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) -> EngineResult<()> {
        ctx.camera.set_smoothing(0.9);

        let colors = [
            Vec3::new(1.0, 0.4, 0.4),
            Vec3::new(0.4, 1.0, 0.4),
            Vec3::new(0.4, 0.6, 1.0),
            Vec3::new(1.0, 1.0, 0.4),
        ];
        for (i, color) in colors.into_iter().enumerate() {
            let start = Vec2::new(-0.9 + 0.6 * i as f32, -0.5);
            let end = start + Vec2::new(0.0, 1.0);
            let orb = ctx
                .objects
                .create(format!("orb-{}", i))
                .with_position(start)
                .with(
                    SpriteRenderer::new("orb.png")
                        .with_size(Vec2::splat(0.2))
                        .with_color(color)
                        .with_z_order(i as i32),
                )?
                .with(TweenComponent::new().with(
                    Tween::position(start, end, 1.0 + 0.25 * i as f32, Easing::SineInOut)
                        .with_loop(TweenLoop::PingPong),
                ))?;
            let id = ctx.objects.add(orb);
            if i == 0 {
                self.leader = Some(id);
            }
        }

        ctx.scheduler.add_delayed(1.0, |task| {
            task.events.push(GameEvent::with_payload(SCORE, 100.0, 0.0, 0.0));
        });
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend) {
        self.leader = None;
        ctx.camera.set_position(Vec2::ZERO);
    }

    fn on_update(&mut self, ctx: &mut EngineContext, _gpu: &mut dyn GpuBackend, dt: f32) {
        if let Some(target) = self.leader.and_then(|id| ctx.objects.get(id)) {
            let position = target.transform.world().position;
            ctx.camera.follow(position, dt);
        }
        if ctx.input.key_pressed(keys::ESCAPE) {
            ctx.request_scene("MainMenu");
        }
    }
}
