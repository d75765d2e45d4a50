// extensions/tween.rs
//
// Time-driven position tween ("dash" / scripted movement).
// One tween per hitbox; the hitbox decides what to do with the produced positions.
//
// Usage:
//   let mut tween = Tween::inert(pos);
//   tween.arm(pos, target, 0.25, Easing::Out(Curve::Quart));
//   match tween.advance(dt) { TweenStep::Moving(p) | TweenStep::Finished(p) => pos = p, _ => {} }

use glam::Vec2;

use super::easing::{ease, Easing};

/// Result of advancing a tween by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep {
    /// Tween is not running; nothing to apply.
    Idle,
    /// Still running; the object should be placed here.
    Moving(Vec2),
    /// Reached its duration this frame; snapped exactly to the target.
    Finished(Vec2),
}

/// Interpolated movement state. While inactive, `target`/`elapsed` are stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    start: Vec2,
    target: Vec2,
    /// Duration in seconds.
    duration: f32,
    /// Elapsed time in seconds, never negative.
    elapsed: f32,
    easing: Easing,
    active: bool,
}

impl Tween {
    /// An inactive tween sitting at `pos` with zero duration.
    pub fn inert(pos: Vec2) -> Self {
        Self {
            start: pos,
            target: pos,
            duration: 0.0,
            elapsed: 0.0,
            easing: Easing::Linear,
            active: false,
        }
    }

    /// Start moving from `from` to `to` over `duration` seconds.
    ///
    /// # Panics
    /// When `duration` is negative or not finite.
    pub fn arm(&mut self, from: Vec2, to: Vec2, duration: f32, easing: Easing) {
        assert!(
            duration.is_finite() && duration >= 0.0,
            "tween duration must be finite and >= 0, got {duration}"
        );
        self.start = from;
        self.target = to;
        self.duration = duration;
        self.elapsed = 0.0;
        self.easing = easing;
        self.active = true;
    }

    /// Advance by `dt` seconds. Positions are replayed from the captured start
    /// and target, so the same elapsed time always yields the same point.
    pub fn advance(&mut self, dt: f32) -> TweenStep {
        if !self.active {
            return TweenStep::Idle;
        }

        self.elapsed += dt.max(0.0);

        if self.elapsed >= self.duration {
            self.active = false;
            return TweenStep::Finished(self.target);
        }

        let t = self.elapsed / self.duration;
        TweenStep::Moving(ease(self.start, self.target, t, self.easing))
    }

    /// Halt early at `at` without a final snap to the old target.
    pub fn interrupt(&mut self, at: Vec2) {
        self.active = false;
        self.target = at;
    }

    /// Pin the vertical axis of the remaining travel to `y`.
    /// Horizontal travel continues untouched.
    pub fn pin_y(&mut self, y: f32) {
        self.start.y = y;
        self.target.y = y;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}
