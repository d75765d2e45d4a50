use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;

/// Screen (room) dimensions in pixels. Consumed by the off-screen predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Screen {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1600.0, 900.0)
    }
}

/// Axis-aligned rectangle. `pos` is the top-left corner, y grows downward.
///
/// Position is the single source of truth: every edge/center query is derived
/// from the current `pos` on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle, rejecting non-finite coordinates and non-positive sizes.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        if !(x.is_finite() && y.is_finite()) {
            return Err(EngineError::NonFinitePosition { x, y });
        }
        Ok(Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        })
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Integer pixel origin for presentation. Derived, never stored.
    pub fn draw_origin(&self) -> IVec2 {
        self.pos.floor().as_ivec2()
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// The overlapping region of two rectangles, or `None` when they do not intersect.
    pub fn clip(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.pos.max(other.pos);
        let max = Vec2::new(self.right().min(other.right()), self.bottom().min(other.bottom()));
        Some(Rect {
            pos: min,
            size: max - min,
        })
    }

    // -- Directional off-screen predicates --

    pub fn off_screen_left(&self) -> bool {
        self.left() < 0.0
    }

    pub fn off_screen_right(&self, screen: &Screen) -> bool {
        self.right() > screen.width
    }

    pub fn off_screen_up(&self) -> bool {
        self.bottom() < 0.0
    }

    pub fn off_screen_down(&self, screen: &Screen) -> bool {
        self.top() > screen.height
    }
}
