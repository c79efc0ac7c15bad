use bytemuck::{Pod, Zeroable};

/// Unique identifier for a game object. Never reused within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// A game event emitted by components, tweens or scenes during a frame.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: u32) -> Self {
        Self { kind: kind as f32, ..Default::default() }
    }

    pub fn with_payload(kind: u32, a: f32, b: f32, c: f32) -> Self {
        Self { kind: kind as f32, a, b, c }
    }

    pub fn kind_id(&self) -> u32 {
        self.kind as u32
    }
}

/// Audio playback request handed to the host platform at the end of a frame.
/// The engine never decodes or mixes audio itself.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    Play { source: ObjectId, clip: String, volume: f32, looping: bool },
    Pause { source: ObjectId },
    Stop { source: ObjectId },
    SetVolume { source: ObjectId, volume: f32 },
}

impl AudioCommand {
    pub fn source(&self) -> ObjectId {
        match self {
            AudioCommand::Play { source, .. }
            | AudioCommand::Pause { source }
            | AudioCommand::Stop { source }
            | AudioCommand::SetVolume { source, .. } => *source,
        }
    }
}
