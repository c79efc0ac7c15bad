use thiserror::Error;

use crate::api::types::ObjectId;
use crate::components::ComponentKind;

/// Errors surfaced by the engine core.
///
/// Resource and allocator failures are returned to the caller (usually a
/// component `start` or a scene `on_enter`), which decides whether to fall
/// back. Failures inside the renderer flush never reach here; they are
/// logged and the offending command is skipped.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load '{path}': {reason}")]
    LoadError { path: String, reason: String },

    #[error("GPU out of memory while allocating {what}")]
    OutOfMemory { what: String },

    #[error("resource handle is stale or was never issued")]
    ResourceNotFound,

    #[error("resource freed twice")]
    DoubleFree,

    #[error("GPU backend rejected draw command: {0}")]
    GpuCommandRejected(String),

    #[error("no scene registered as {0}")]
    SceneNotFound(String),

    #[error("scene '{0}' already registered")]
    SceneAlreadyExists(String),

    #[error("object already has a {0:?} component")]
    DuplicateComponent(ComponentKind),

    #[error("object has no live {0:?} component")]
    ComponentNotFound(ComponentKind),

    #[error("object {0:?} does not exist")]
    ObjectNotFound(ObjectId),

    #[error("cannot parent {child:?} under {parent:?}: would create a cycle")]
    InvalidParent { child: ObjectId, parent: ObjectId },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
