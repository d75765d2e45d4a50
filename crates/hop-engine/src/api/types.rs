use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete address of a room within the level's room grid.
/// `x` grows to the right, `y` grows downward (same as screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// Sentinel location of the debug room. Never reachable by crossing an edge.
    pub const DEBUG: GridCoord = GridCoord::new(-1000, -1000);
    /// Sentinel location of the game-over room. Not adjacent to [`Self::DEBUG`].
    pub const GAME_OVER: GridCoord = GridCoord::new(-1000, -2000);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell offset by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Key of a stage in the stage table: a small number for regular rooms
/// or a symbolic name such as `"DEBUG"` / `"GAME_OVER"` for special ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageKey {
    Id(u32),
    Named(String),
}

impl StageKey {
    pub const DEBUG_NAME: &'static str = "DEBUG";
    pub const GAME_OVER_NAME: &'static str = "GAME_OVER";

    pub fn debug() -> Self {
        StageKey::Named(Self::DEBUG_NAME.to_string())
    }

    pub fn game_over() -> Self {
        StageKey::Named(Self::GAME_OVER_NAME.to_string())
    }
}

impl From<u32> for StageKey {
    fn from(id: u32) -> Self {
        StageKey::Id(id)
    }
}

impl From<&str> for StageKey {
    fn from(name: &str) -> Self {
        StageKey::Named(name.to_string())
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKey::Id(id) => write!(f, "{id}"),
            StageKey::Named(name) => f.write_str(name),
        }
    }
}

/// 8-bit RGB color. Presentation only; the physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
    pub const LAVA: Color = Color::rgb(255, 64, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels normalized to [0, 1] for the render protocol.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_offset() {
        let g = GridCoord::new(1, 1);
        assert_eq!(g.offset(1, 0), GridCoord::new(2, 1));
        assert_eq!(g.offset(0, -1), GridCoord::new(1, 0));
    }

    #[test]
    fn stage_key_parses_numbers_and_names() {
        let id: StageKey = serde_json::from_str("3").unwrap();
        let name: StageKey = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(id, StageKey::Id(3));
        assert_eq!(name, StageKey::debug());
        assert_eq!(name.to_string(), "DEBUG");
    }

    #[test]
    fn color_rejects_out_of_range_channels() {
        let bad = serde_json::from_str::<Color>(r#"{ "r": 256, "g": 0, "b": 0 }"#);
        assert!(bad.is_err());
        let ok: Color = serde_json::from_str(r#"{ "r": 255, "g": 128, "b": 0 }"#).unwrap();
        assert_eq!(ok, Color::ORANGE);
    }

    #[test]
    fn color_to_unit() {
        assert_eq!(Color::WHITE.to_unit(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::default().to_unit(), [0.0, 0.0, 0.0]);
    }
}
