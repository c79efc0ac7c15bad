// Headless walk through the demo: splash, loading screen, menu, game.
//
// Runs a fixed number of frames on the recording backend with scripted
// input and logs what the engine hands back to the host.

mod assets;
mod scenes;

use glam::Vec2;
use scrap_engine::{keys, AudioCommand, Engine, EngineConfig, InputEvent, RecordingBackend};

use scenes::{GameScene, LoadScene, MainMenuScene, SplashScene, PLAY_CLICKED, SCORE};

const CONFIG: &str = r#"{
    "viewport_width": 960,
    "viewport_height": 540,
    "clear_color": [0.05, 0.05, 0.1, 1.0],
    "target_fps": 60,
    "frames_in_flight": 2,
    "initial_scene": "Splash"
}"#;

const DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 900;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::from_json(CONFIG)?;
    let assets = assets::build()?;

    let mut engine = Engine::new(config, RecordingBackend::new(), Box::new(assets))?;
    engine.add_scene(SplashScene::default())?;
    engine.add_scene(LoadScene::default())?;
    engine.add_scene(MainMenuScene)?;
    engine.add_scene(GameScene::default())?;
    engine.start()?;

    let mut clicked = false;
    for frame in 0..FRAMES {
        script_input(&mut engine, frame, &mut clicked);

        let report = engine.tick(DT)?;
        for command in &report.audio {
            log::info!("audio: {:?}", command);
            if let AudioCommand::Play { source, looping: false, .. } = command {
                engine.notify_audio_finished(*source);
            }
        }
        for event in &report.events {
            match event.kind_id() {
                PLAY_CLICKED => log::info!("event: play clicked"),
                SCORE => log::info!("event: score +{}", event.a),
                other => log::debug!("event: {}", other),
            }
        }
        if report.scene_changed {
            log::info!(
                "frame {}: now in '{}' ({} draws, {} batches)",
                report.frame,
                engine.current_scene().unwrap_or("-"),
                report.stats.drawn,
                report.stats.batches
            );
        }
    }

    engine.shutdown();
    let backend = engine.backend();
    log::info!(
        "backend: {} draws, {} textures created, {} buffers created, {} destroyed",
        backend.draw_count(),
        backend.texture_creations(),
        backend.buffer_creations(),
        backend.destroyed()
    );
    Ok(())
}

/// Skip the splash with SPACE, then press the menu's play button once.
fn script_input(engine: &mut Engine<RecordingBackend>, frame: u32, clicked: &mut bool) {
    let scene = engine.current_scene().map(str::to_owned);
    match scene.as_deref() {
        Some("Splash") if frame == 60 => {
            engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
            engine.push_input(InputEvent::KeyUp { key_code: keys::SPACE });
        }
        Some("MainMenu") if !*clicked => {
            let ctx = engine.context();
            let Some(play) = ctx.objects.find("play") else {
                return;
            };
            let at: Vec2 = ctx.camera.world_to_screen(play.transform.position);
            engine.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
            engine.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
            *clicked = true;
        }
        _ => {}
    }
}
