pub mod collection;
pub mod hierarchy;
pub mod scene;
pub mod scheduler;
pub mod time;

pub use collection::GameObjectCollection;
pub use hierarchy::Hierarchy;
pub use scene::{Scene, SceneStateMachine, SceneTarget, TransitionRequest};
pub use scheduler::{Scheduler, TaskContext, TaskId, TaskStatus};
pub use time::FrameClock;
