// extensions/mod.rs
//
// Optional extension modules — decoupled from core Entity/Scene.
// Games opt in by owning these systems themselves.

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use scheduler::{Scheduler, ScheduledEvent};
pub use tween::{TweenState, Tween, TweenId, TweenTarget, TweenLoop, TweenEvent};
