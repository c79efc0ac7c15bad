// extensions/mod.rs
//
// Small standalone utilities used by components and available to games:
// easing curves for tweens and a typed observer list.

pub mod easing;
pub mod signal;

pub use easing::{ease, Easing, Lerp};
pub use signal::{Signal, SlotId};
