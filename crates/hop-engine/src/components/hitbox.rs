use glam::Vec2;

use crate::api::error::EngineError;
use crate::api::types::Color;
use crate::core::geometry::Rect;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenStep};
use crate::renderer::instance::{Drawable, RenderBuffer, RenderInstance, Shape};

/// The base movable/collidable rectangle: one authoritative position,
/// a vertical velocity accumulator, a collision flag and a tween.
#[derive(Debug, Clone)]
pub struct Hitbox {
    pub rect: Rect,
    /// Vertical velocity in px/s (positive = down). Horizontal motion is a direct position delta.
    pub y_vel: f32,
    has_collision: bool,
    pub color: Color,
    tween: Tween,
    /// Collision state to restore when a collision-suppressing tween ends.
    restore_collision: Option<bool>,
}

impl Hitbox {
    pub const DEFAULT_COLOR: Color = Color::GREEN;

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        Ok(Self::from_rect(Rect::new(x, y, width, height)?))
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            y_vel: 0.0,
            has_collision: true,
            color: Self::DEFAULT_COLOR,
            tween: Tween::inert(rect.pos),
            restore_collision: None,
        }
    }

    // -- Builder pattern --

    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.has_collision = enabled;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.rect.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: Vec2) {
        self.rect.pos = pos;
    }

    #[inline]
    pub fn has_collision(&self) -> bool {
        self.has_collision
    }

    /// Enable or disable collision. While a collision-suppressing tween is running
    /// the new value is what gets restored when the tween ends.
    pub fn set_collision(&mut self, enabled: bool) {
        match self.restore_collision.as_mut() {
            Some(saved) => *saved = enabled,
            None => self.has_collision = enabled,
        }
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_active()
    }

    /// Tween from the current position to `target` over `duration` seconds.
    /// With `disable_collision` the hitbox passes through geometry until the
    /// tween completes or is interrupted.
    ///
    /// # Panics
    /// When `duration` is negative or not finite.
    pub fn move_to(&mut self, target: Vec2, duration: f32, easing: Easing, disable_collision: bool) {
        if disable_collision {
            if self.restore_collision.is_none() {
                self.restore_collision = Some(self.has_collision);
            }
            self.has_collision = false;
        }
        self.tween.arm(self.rect.pos, target, duration, easing);
    }

    /// Advance the tween by one frame. Tweened motion overrides gravity, so the
    /// vertical velocity is zeroed while it runs. Returns true on the frame it completes.
    pub fn advance_tween(&mut self, dt: f32) -> bool {
        if !self.tween.is_active() {
            return false;
        }
        self.y_vel = 0.0;
        match self.tween.advance(dt) {
            TweenStep::Idle => false,
            TweenStep::Moving(pos) => {
                self.rect.pos = pos;
                false
            }
            TweenStep::Finished(pos) => {
                self.rect.pos = pos;
                self.finish_collision_suppression();
                true
            }
        }
    }

    /// Stop the tween where the hitbox currently is. No-op when idle.
    pub fn interrupt_tween(&mut self) {
        if self.tween.is_active() {
            self.tween.interrupt(self.rect.pos);
            self.finish_collision_suppression();
        }
    }

    /// Keep a running tween from driving the hitbox vertically away from `y`.
    pub(crate) fn pin_tween_y(&mut self, y: f32) {
        if self.tween.is_active() {
            self.tween.pin_y(y);
        }
    }

    fn finish_collision_suppression(&mut self) {
        if let Some(enabled) = self.restore_collision.take() {
            self.has_collision = enabled;
        }
    }

    pub(crate) fn render_instance(&self, shape: Shape) -> RenderInstance {
        let [r, g, b] = self.color.to_unit();
        RenderInstance {
            x: self.rect.x(),
            y: self.rect.y(),
            width: self.rect.width(),
            height: self.rect.height(),
            r,
            g,
            b,
            shape: shape.as_f32(),
        }
    }
}

impl Drawable for Hitbox {
    fn draw(&self, target: &mut RenderBuffer) {
        target.push(self.render_instance(Shape::Rect));
    }
}
