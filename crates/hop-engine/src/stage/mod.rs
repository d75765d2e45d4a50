//! Stage graph: rooms addressed by grid coordinate.
//!
//! A [`StageTable`] maps stage keys to [`Stage`] records and answers the reverse
//! question used by room transitions: which stage lives at this grid cell?

pub mod manifest;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::api::types::{Color, GridCoord, StageKey};
use crate::components::group::Group;
use crate::components::surfaces::Collidable;
use crate::renderer::instance::{Drawable, RenderBuffer};

pub use manifest::{ObjectDescriptor, StageDescriptor, StageManifest};

/// Text drawn in a room (tutorial hints, "GAME OVER").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInfo {
    pub message: String,
    pub position: Vec2,
    #[serde(default = "default_text_size")]
    pub size: u32,
    #[serde(default = "default_text_color")]
    pub color: Color,
}

fn default_text_size() -> u32 {
    100
}

fn default_text_color() -> Color {
    Color::WHITE
}

impl TextInfo {
    pub fn new(message: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            message: message.into(),
            position: Vec2::new(x, y),
            size: default_text_size(),
            color: default_text_color(),
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Drawable for TextInfo {
    fn draw(&self, target: &mut RenderBuffer) {
        target.push_text(self.clone());
    }
}

/// Regular rooms are reached by crossing screen edges; special rooms
/// (debug, game over) only by explicit teleport and sit at sentinel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageKind {
    #[default]
    Regular,
    Special,
}

/// Contents of one room.
#[derive(Debug, Clone)]
pub struct Stage {
    pub grid_location: GridCoord,
    pub kind: StageKind,
    pub platforms: Group,
    pub spikes: Option<Group>,
    pub hazard_liquid: Option<Group>,
    pub text: Option<Vec<TextInfo>>,
}

impl Stage {
    pub fn new(grid_location: GridCoord, platforms: Group) -> Self {
        Self {
            grid_location,
            kind: StageKind::Regular,
            platforms,
            spikes: None,
            hazard_liquid: None,
            text: None,
        }
    }

    /// A special room at a sentinel coordinate.
    pub fn special(sentinel: GridCoord, platforms: Group) -> Self {
        Self {
            kind: StageKind::Special,
            ..Self::new(sentinel, platforms)
        }
    }

    // -- Builder pattern --

    pub fn with_spikes(mut self, spikes: Group) -> Self {
        self.spikes = Some(spikes);
        self
    }

    pub fn with_hazard_liquid(mut self, liquid: Group) -> Self {
        self.hazard_liquid = Some(liquid);
        self
    }

    pub fn with_text(mut self, text: Vec<TextInfo>) -> Self {
        self.text = Some(text);
        self
    }

    pub fn is_special(&self) -> bool {
        self.kind == StageKind::Special
    }
}

impl Drawable for Stage {
    fn draw(&self, target: &mut RenderBuffer) {
        self.platforms.draw(target);
        for group in [&self.spikes, &self.hazard_liquid].into_iter().flatten() {
            group.draw(target);
        }
        for text in self.text.iter().flatten() {
            text.draw(target);
        }
    }
}

/// A platform that may be thin enough for a fast body to pass through in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinPlatform {
    pub stage: StageKey,
    pub name: String,
    pub thickness: f32,
}

/// Ordered stage table. Grid locations are unique across all entries, so the
/// reverse lookup is unambiguous.
#[derive(Debug, Clone, Default)]
pub struct StageTable {
    entries: Vec<(StageKey, Stage)>,
}

impl StageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage. Rejects a repeated key or an already-used grid location.
    pub fn insert(&mut self, key: impl Into<StageKey>, stage: Stage) -> Result<(), EngineError> {
        let key = key.into();
        if self.get(&key).is_some() {
            return Err(EngineError::DuplicateStageKey(key));
        }
        if let Some((existing, _)) = self
            .entries
            .iter()
            .find(|(_, s)| s.grid_location == stage.grid_location)
        {
            return Err(EngineError::DuplicateGridLocation {
                grid: stage.grid_location,
                existing: existing.clone(),
                incoming: key,
            });
        }
        self.entries.push((key, stage));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_stage(mut self, key: impl Into<StageKey>, stage: Stage) -> Result<Self, EngineError> {
        self.insert(key, stage)?;
        Ok(self)
    }

    /// Key of the stage at `grid`. A miss means the level data is incomplete.
    pub fn lookup_stage(&self, grid: GridCoord) -> Result<&StageKey, EngineError> {
        self.entries
            .iter()
            .find(|(_, s)| s.grid_location == grid)
            .map(|(k, _)| k)
            .ok_or(EngineError::StageNotFound { grid })
    }

    /// [`lookup_stage`](Self::lookup_stage) for edge crossings: special rooms
    /// are only entered through debug or death moves, so a special match is a miss.
    pub fn lookup_regular(&self, grid: GridCoord) -> Result<&StageKey, EngineError> {
        self.entries
            .iter()
            .find(|(_, s)| s.grid_location == grid && !s.is_special())
            .map(|(k, _)| k)
            .ok_or(EngineError::StageNotFound { grid })
    }

    pub fn get(&self, key: &StageKey) -> Option<&Stage> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, key: &StageKey) -> Option<&mut Stage> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn stage(&self, key: &StageKey) -> Result<&Stage, EngineError> {
        self.get(key).ok_or_else(|| EngineError::UnknownStage(key.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StageKey, &Stage)> {
        self.entries.iter().map(|(k, s)| (k, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Solid platforms thinner than `min_thickness` on either axis.
    pub fn thin_geometry(&self, min_thickness: f32) -> Vec<ThinPlatform> {
        let mut thin = Vec::new();
        for (key, stage) in &self.entries {
            for (name, object) in stage.platforms.iter() {
                if !object.is_solid() {
                    continue;
                }
                let rect = object.hitbox().rect;
                let thickness = rect.width().min(rect.height());
                if thickness < min_thickness {
                    thin.push(ThinPlatform {
                        stage: key.clone(),
                        name: name.to_string(),
                        thickness,
                    });
                }
            }
        }
        thin
    }
}
