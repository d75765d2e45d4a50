pub mod api;
pub mod core;
pub mod components;
pub mod entities;
pub mod renderer;
pub mod input;
pub mod stage;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::EngineError;
pub use api::game::{GameConfig, PlayerConfig, SpawnPoint, TickOutcome, World};
pub use api::types::{Color, GridCoord, StageKey};
pub use components::group::{Group, ObjectPatch};
pub use components::hitbox::Hitbox;
pub use components::surfaces::{Collidable, Lava, LevelObject, Platform, Spike};
pub use crate::core::geometry::{Rect, Screen};
pub use crate::core::physics::Environment;
pub use crate::core::time::SubSteps;
pub use entities::player::{Facing, Hit, Jump, Player, PlayerEvents, Transition};
pub use input::actions::{ActionTracker, Actions, FrameActions, KeyMap};
pub use renderer::instance::{Drawable, RenderBuffer, RenderInstance};
pub use stage::{Stage, StageKind, StageManifest, StageTable, TextInfo};

// Extensions
pub use extensions::{Curve, Easing, Tween, TweenStep, ease, lerp, lerp_vec2};
