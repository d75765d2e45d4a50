// extensions/mod.rs
//
// Motion helpers layered over the core geometry.
// Nothing here knows about platforms or players; hitboxes opt in by owning a Tween.

pub mod easing;
pub mod tween;

pub use easing::{Curve, Easing, lerp, lerp_vec2, ease};
pub use tween::{Tween, TweenStep};
