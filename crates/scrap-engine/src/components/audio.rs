use super::{ComponentContext, ComponentHooks, DestroyContext};
use crate::api::types::AudioCommand;
use crate::assets::manifest::SoundDescriptor;
use crate::error::EngineResult;

#[derive(Debug, Clone, Copy, PartialEq)]
enum AudioOp {
    Play,
    Pause,
    Stop,
    SetVolume(f32),
}

/// Plays a clip through the host's audio system.
///
/// Playback requests are queued and handed to the host as
/// [`AudioCommand`]s during the component's next update. The host reports
/// a finished clip back through the engine, which clears `is_playing`.
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub clip: String,
    pub volume: f32,
    pub looping: bool,
    pub play_on_start: bool,
    playing: bool,
    paused: bool,
    queued: Vec<AudioOp>,
}

impl AudioSource {
    pub fn new(clip: impl Into<String>) -> Self {
        Self {
            clip: clip.into(),
            volume: 1.0,
            looping: false,
            play_on_start: false,
            playing: false,
            paused: false,
            queued: Vec::new(),
        }
    }

    /// A source for a manifest sound entry, at the entry's volume.
    pub fn from_descriptor(sound: &SoundDescriptor) -> Self {
        Self::new(sound.path.clone()).with_volume(sound.volume)
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn play_on_start(mut self) -> Self {
        self.play_on_start = true;
        self
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.paused = false;
        self.queued.push(AudioOp::Play);
    }

    pub fn pause(&mut self) {
        if self.playing && !self.paused {
            self.paused = true;
            self.queued.push(AudioOp::Pause);
        }
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            self.paused = false;
            self.queued.push(AudioOp::Stop);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.queued.push(AudioOp::SetVolume(self.volume));
    }

    /// Playing and not paused.
    pub fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    /// Called when the host reports the clip ended.
    pub fn mark_finished(&mut self) {
        if !self.looping {
            self.playing = false;
            self.paused = false;
        }
    }
}

impl ComponentHooks for AudioSource {
    fn start(&mut self, _ctx: &mut ComponentContext<'_, '_>) -> EngineResult<()> {
        if self.play_on_start {
            self.play();
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_, '_>) {
        let source = ctx.object;
        for op in self.queued.drain(..) {
            let command = match op {
                AudioOp::Play => AudioCommand::Play {
                    source,
                    clip: self.clip.clone(),
                    volume: self.volume,
                    looping: self.looping,
                },
                AudioOp::Pause => AudioCommand::Pause { source },
                AudioOp::Stop => AudioCommand::Stop { source },
                AudioOp::SetVolume(volume) => AudioCommand::SetVolume { source, volume },
            };
            ctx.services.audio.push(command);
        }
    }

    fn on_destroy(&mut self, ctx: &mut DestroyContext<'_>) {
        if self.playing {
            ctx.audio.push(AudioCommand::Stop { source: ctx.object });
            self.playing = false;
        }
        self.queued.clear();
    }
}
