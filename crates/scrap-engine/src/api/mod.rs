pub mod config;
pub mod engine;
pub mod types;

pub use config::EngineConfig;
pub use engine::{Engine, EngineContext, FrameReport};
pub use types::{AudioCommand, GameEvent, ObjectId};
