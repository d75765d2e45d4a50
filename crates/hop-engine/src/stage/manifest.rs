use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::api::types::{Color, GridCoord, StageKey};
use crate::components::group::Group;
use crate::components::hitbox::Hitbox;
use crate::components::surfaces::{Lava, LevelObject, Platform, Spike};
use crate::stage::{Stage, StageKind, StageTable, TextInfo};

/// Level data describing every room of a game.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageManifest {
    pub stages: Vec<StageDescriptor>,
}

/// One room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Integer id for regular rooms, `"DEBUG"` / `"GAME_OVER"` for special ones.
    pub key: StageKey,
    pub grid: GridCoord,
    /// Special rooms are only reached by teleport.
    #[serde(default)]
    pub special: bool,
    pub platforms: Vec<ObjectDescriptor>,
    #[serde(default)]
    pub spikes: Option<Vec<ObjectDescriptor>>,
    #[serde(default)]
    pub lava: Option<Vec<ObjectDescriptor>>,
    #[serde(default)]
    pub text: Option<Vec<TextInfo>>,
}

/// Placement of a single platform or hazard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_collision")]
    pub has_collision: bool,
    /// Overrides the kind's default color.
    #[serde(default)]
    pub color: Option<Color>,
    /// Overrides the hazard's default damage. Ignored on platforms.
    #[serde(default)]
    pub damage: Option<u32>,
}

fn default_collision() -> bool {
    true
}

impl ObjectDescriptor {
    fn apply(&self, hitbox: &mut Hitbox) {
        hitbox.set_collision(self.has_collision);
        if let Some(color) = self.color {
            hitbox.color = color;
        }
    }

    fn platform(&self) -> Result<LevelObject, EngineError> {
        let mut p = Platform::new(self.x, self.y, self.width, self.height)?;
        self.apply(&mut p.hitbox);
        Ok(p.into())
    }

    fn spike(&self) -> Result<LevelObject, EngineError> {
        let mut s = Spike::new(self.x, self.y, self.width, self.height)?;
        if let Some(damage) = self.damage {
            s.damage = damage;
        }
        self.apply(&mut s.hitbox);
        Ok(s.into())
    }

    fn lava(&self) -> Result<LevelObject, EngineError> {
        let mut l = Lava::new(self.x, self.y, self.width, self.height)?;
        if let Some(damage) = self.damage {
            l.damage = damage;
        }
        self.apply(&mut l.hitbox);
        Ok(l.into())
    }
}

fn build_group(
    descriptors: &[ObjectDescriptor],
    build: impl Fn(&ObjectDescriptor) -> Result<LevelObject, EngineError>,
) -> Result<Group, EngineError> {
    descriptors.iter().map(build).collect()
}

impl StageDescriptor {
    fn build(&self) -> Result<Stage, EngineError> {
        let mut stage = Stage::new(self.grid, build_group(&self.platforms, ObjectDescriptor::platform)?);
        if self.special {
            stage.kind = StageKind::Special;
        }
        if let Some(spikes) = &self.spikes {
            stage.spikes = Some(build_group(spikes, ObjectDescriptor::spike)?);
        }
        if let Some(lava) = &self.lava {
            stage.hazard_liquid = Some(build_group(lava, ObjectDescriptor::lava)?);
        }
        stage.text = self.text.clone();
        Ok(stage)
    }
}

impl StageManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build and validate the stage table. Fails on bad dimensions,
    /// repeated keys, or two rooms sharing a grid cell.
    pub fn into_table(self) -> Result<StageTable, EngineError> {
        let mut table = StageTable::new();
        for descriptor in &self.stages {
            table.insert(descriptor.key.clone(), descriptor.build()?)?;
        }
        log::info!("Stage table built: {} stages", table.len());
        Ok(table)
    }
}
