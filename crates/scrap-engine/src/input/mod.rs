pub mod queue;
pub mod state;

pub use queue::{keys, InputEvent, InputQueue};
pub use state::InputState;
