use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::api::types::{Color, GridCoord};
use crate::core::geometry::Screen;
use crate::core::physics::{
    Environment, DEFAULT_COLLISION_EPSILON, DEFAULT_GRAVITY, DEFAULT_MAX_FALL_SPEED,
};
use crate::core::time::SubSteps;
use crate::entities::player::{Player, PlayerEvents};
use crate::extensions::easing::{Curve, Easing};
use crate::input::actions::{Actions, FrameActions};
use crate::renderer::instance::{Drawable, RenderBuffer};
use crate::stage::{Stage, StageTable};

/// A room address plus a position inside that room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub grid: GridCoord,
    pub position: Vec2,
}

impl SpawnPoint {
    pub fn new(grid: GridCoord, x: f32, y: f32) -> Self {
        Self {
            grid,
            position: Vec2::new(x, y),
        }
    }
}

/// Player tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in px/s.
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    /// Subtracted from the vertical velocity by a ground jump.
    pub jump_impulse: f32,
    /// Upward speed a double jump sets.
    pub double_jump_velocity: f32,
    /// Upward speed set on hazard contact.
    pub knockback_velocity: f32,
    /// Updates of damage immunity after a hit.
    pub i_frames: u32,
    /// Seconds after a ground jump before a held jump turns into a double jump.
    pub jump_cooldown: f32,
    pub dash_distance: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub dash_easing: Easing,
    /// Suppress collision for the duration of a dash.
    pub dash_passes_through: bool,
    pub color: Color,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 80.0,
            speed: 500.0,
            health: 10,
            max_health: 10,
            jump_impulse: 500.0,
            double_jump_velocity: 500.0,
            knockback_velocity: 500.0,
            i_frames: 10,
            jump_cooldown: 0.25,
            dash_distance: 250.0,
            dash_duration: 0.2,
            dash_cooldown: 0.75,
            dash_easing: Easing::Out(Curve::Quad),
            dash_passes_through: false,
            color: Color::WHITE,
        }
    }
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Room dimensions in pixels (default: 1600x900).
    pub screen: Screen,
    /// Downward acceleration in px/s² (default: 1000).
    pub gravity: f32,
    /// Terminal fall speed in px/s (default: 1500). One step of fall must
    /// stay shallower than the player's width minus the epsilon, or a landing
    /// is classified as a wall hit.
    pub max_fall_speed: f32,
    /// Tie-break margin of the overlap classifier (default: 3).
    pub collision_epsilon: f32,
    /// Longest simulated step in seconds (default: 1/60).
    pub max_substep: f32,
    /// Maximum steps per tick (default: 10).
    pub max_substeps: u32,
    /// Warn about solid platforms thinner than this. 0 disables the check.
    pub min_platform_thickness: f32,
    pub player: PlayerConfig,
    pub start: SpawnPoint,
    /// Where the player goes when health reaches zero.
    pub respawn: SpawnPoint,
    pub debug_spawn: SpawnPoint,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            collision_epsilon: DEFAULT_COLLISION_EPSILON,
            max_substep: 1.0 / 60.0,
            max_substeps: 10,
            min_platform_thickness: 0.0,
            player: PlayerConfig::default(),
            start: SpawnPoint::new(GridCoord::new(1, 1), 100.0, 0.0),
            respawn: SpawnPoint::new(GridCoord::GAME_OVER, 775.0, 460.0),
            debug_spawn: SpawnPoint::new(GridCoord::DEBUG, 775.0, 0.0),
        }
    }
}

fn check(ok: bool, what: &str) -> Result<(), EngineError> {
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(what.to_string()))
    }
}

impl GameConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let p = &self.player;
        check(
            self.screen.width > 0.0 && self.screen.height > 0.0,
            "screen dimensions must be > 0",
        )?;
        check(self.gravity.is_finite(), "gravity must be finite")?;
        check(self.collision_epsilon >= 0.0, "collision_epsilon must be >= 0")?;
        check(
            self.max_substep > 0.0 && self.max_substep.is_finite(),
            "max_substep must be finite and > 0",
        )?;
        check(self.max_substeps > 0, "max_substeps must be > 0")?;
        check(
            self.min_platform_thickness >= 0.0,
            "min_platform_thickness must be >= 0",
        )?;
        check(p.width > 0.0 && p.height > 0.0, "player size must be > 0")?;
        check(
            self.max_fall_speed > 0.0 && self.max_fall_speed.is_finite(),
            "max_fall_speed must be finite and > 0",
        )?;
        check(
            self.max_fall_speed * self.max_substep < p.width - self.collision_epsilon,
            "max_fall_speed * max_substep must be < player width - collision_epsilon",
        )?;
        check(p.max_health > 0, "player max_health must be > 0")?;
        check(p.health <= p.max_health, "player health exceeds max_health")?;
        check(
            p.jump_cooldown >= 0.0 && p.dash_cooldown >= 0.0,
            "cooldowns must be >= 0",
        )?;
        check(
            p.dash_duration >= 0.0 && p.dash_duration.is_finite(),
            "dash_duration must be finite and >= 0",
        )?;
        check(p.dash_distance >= 0.0, "dash_distance must be >= 0")?;
        Ok(())
    }

    pub fn environment(&self) -> Environment {
        Environment {
            screen: self.screen,
            gravity: self.gravity,
            max_fall_speed: self.max_fall_speed,
            collision_epsilon: self.collision_epsilon,
        }
    }
}

/// Result of one [`World::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running(PlayerEvents),
    /// Quit was requested; nothing was simulated.
    Quit,
}

/// The player, the stage table and the per-frame orchestration around them.
pub struct World {
    config: GameConfig,
    table: StageTable,
    player: Player,
    substeps: SubSteps,
    /// Where to go back to when leaving the debug room.
    debug_return: Option<SpawnPoint>,
}

impl World {
    pub fn new(config: GameConfig, table: StageTable) -> Result<Self, EngineError> {
        config.validate()?;
        if config.min_platform_thickness > 0.0 {
            for thin in table.thin_geometry(config.min_platform_thickness) {
                log::warn!(
                    "Stage {} platform '{}' is {}px thick (< {}), fast bodies may pass through",
                    thin.stage,
                    thin.name,
                    thin.thickness,
                    config.min_platform_thickness
                );
            }
        }
        let player = Player::new(
            config.player.clone(),
            config.environment(),
            &config.start,
            config.respawn,
            &table,
        )?;
        let substeps = SubSteps::new(config.max_substep, config.max_substeps);
        Ok(Self {
            config,
            table,
            player,
            substeps,
            debug_return: None,
        })
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32, actions: FrameActions) -> Result<TickOutcome, EngineError> {
        if actions.held.contains(Actions::QUIT) {
            return Ok(TickOutcome::Quit);
        }
        if actions.pressed.contains(Actions::RESTART) {
            self.restart()?;
        }
        if actions.pressed.contains(Actions::DEBUG_TOGGLE) {
            self.toggle_debug()?;
        }
        if actions.held.contains(Actions::JUMP) {
            self.player.press_jump();
        }
        if actions.held.contains(Actions::DASH) && self.player.dash_cooldown_remaining() <= 0.0 {
            self.player.dash();
        }

        let plan = self.substeps.plan(dt);
        if plan.dropped > 0.0 {
            log::warn!(
                "Frame of {dt}s exceeds {} sub-steps, dropping {}s",
                plan.steps,
                plan.dropped
            );
        }

        let mut events = PlayerEvents::default();
        for _ in 0..plan.steps {
            if actions.held.contains(Actions::MOVE_LEFT) {
                self.player.move_left(plan.step_dt);
            }
            if actions.held.contains(Actions::MOVE_RIGHT) {
                self.player.move_right(plan.step_dt);
            }
            let stage = self.table.stage(self.player.stage_id())?;
            events.merge(self.player.step(plan.step_dt, stage, &self.table)?);
        }
        self.player.end_frame();
        Ok(TickOutcome::Running(events))
    }

    /// Back to the start point with full health.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.player.reset(&self.config.start, &self.table)?;
        self.debug_return = None;
        log::info!("Restart at grid {}", self.config.start.grid);
        Ok(())
    }

    /// Enter the debug room, or return to where the player left from.
    pub fn toggle_debug(&mut self) -> Result<(), EngineError> {
        match self.debug_return.take() {
            Some(back) => {
                self.player.teleport(&back, &self.table)?;
                log::info!("Leaving debug room, back to grid {}", back.grid);
            }
            None => {
                let here = SpawnPoint {
                    grid: self.player.grid(),
                    position: self.player.pos(),
                };
                self.player.teleport(&self.config.debug_spawn, &self.table)?;
                self.debug_return = Some(here);
                log::info!("Entering debug room from grid {}", here.grid);
            }
        }
        Ok(())
    }

    pub fn in_debug_room(&self) -> bool {
        self.debug_return.is_some()
    }

    /// Record the current room and the player.
    pub fn render(&self, target: &mut RenderBuffer) {
        if let Some(stage) = self.current_stage() {
            stage.draw(target);
        }
        self.player.draw(target);
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.table.get(self.player.stage_id())
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn table(&self) -> &StageTable {
        &self.table
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::StageKey;
    use crate::components::group::Group;
    use crate::components::surfaces::Platform;

    const DT: f32 = 1.0 / 60.0;

    fn floor(y: f32, thickness: f32) -> Group {
        Group::from_objects([Platform::new(0.0, y, 1600.0, thickness).unwrap().into()])
    }

    fn table() -> StageTable {
        StageTable::new()
            .with_stage(1, Stage::new(GridCoord::new(1, 1), floor(500.0, 50.0)))
            .and_then(|t| t.with_stage(2, Stage::new(GridCoord::new(2, 1), floor(500.0, 50.0))))
            .and_then(|t| t.with_stage("DEBUG", Stage::special(GridCoord::DEBUG, floor(800.0, 100.0))))
            .and_then(|t| t.with_stage("GAME_OVER", Stage::special(GridCoord::GAME_OVER, floor(800.0, 100.0))))
            .unwrap()
    }

    fn world() -> World {
        World::new(GameConfig::default(), table()).unwrap()
    }

    fn idle() -> FrameActions {
        FrameActions::default()
    }

    fn run(world: &mut World, frames: usize, actions: FrameActions) -> PlayerEvents {
        let mut all = PlayerEvents::default();
        for _ in 0..frames {
            match world.tick(DT, actions).unwrap() {
                TickOutcome::Running(e) => all.merge(e),
                TickOutcome::Quit => panic!("unexpected quit"),
            }
        }
        all
    }

    #[test]
    fn quit_skips_simulation() {
        let mut w = world();
        let before = w.player().pos();
        let out = w.tick(DT, FrameActions::pressed(Actions::QUIT | Actions::MOVE_RIGHT)).unwrap();
        assert_eq!(out, TickOutcome::Quit);
        assert_eq!(w.player().pos(), before);
    }

    #[test]
    fn player_falls_onto_start_floor() {
        let mut w = world();
        let events = run(&mut w, 120, idle());
        assert!(events.landed);
        assert_eq!(w.player().pos().y, 420.0);
        assert!(w.player().on_ground());
    }

    #[test]
    fn held_jump_becomes_double_jump_after_cooldown() {
        let mut w = world();
        run(&mut w, 120, idle());
        let jump = FrameActions {
            held: Actions::JUMP,
            pressed: Actions::empty(),
        };
        run(&mut w, 1, jump);
        assert!(!w.player().on_ground());
        assert!(w.player().double_jump_available());
        run(&mut w, 20, jump);
        assert!(!w.player().double_jump_available());
    }

    #[test]
    fn walking_right_changes_room() {
        let mut w = world();
        run(&mut w, 120, idle());
        let right = FrameActions {
            held: Actions::MOVE_RIGHT,
            pressed: Actions::empty(),
        };
        // 1500px at 500px/s.
        let events = run(&mut w, 200, right);
        let t = events.transition.unwrap();
        assert_eq!(t.from, GridCoord::new(1, 1));
        assert_eq!(t.to, GridCoord::new(2, 1));
        assert_eq!(w.player().stage_id(), &StageKey::Id(2));
    }

    #[test]
    fn restart_returns_to_start_with_full_health() {
        let mut w = world();
        run(&mut w, 30, idle());
        w.player_mut().take_damage(4);
        w.tick(DT, FrameActions::pressed(Actions::RESTART)).unwrap();
        let p = w.player();
        assert_eq!(p.health(), p.max_health());
        assert_eq!(p.grid(), GridCoord::new(1, 1));
    }

    #[test]
    fn debug_toggle_round_trip() {
        let mut w = world();
        run(&mut w, 120, idle());
        let before = w.player().pos();

        w.tick(DT, FrameActions::pressed(Actions::DEBUG_TOGGLE)).unwrap();
        assert!(w.in_debug_room());
        assert_eq!(w.player().grid(), GridCoord::DEBUG);
        assert_eq!(w.player().stage_id(), &StageKey::debug());

        w.toggle_debug().unwrap();
        assert!(!w.in_debug_room());
        assert_eq!(w.player().grid(), GridCoord::new(1, 1));
        assert_eq!(w.player().pos(), before);
    }

    #[test]
    fn long_frames_still_land_on_thin_floor() {
        let mut t = StageTable::new();
        t.insert(1, Stage::new(GridCoord::new(1, 1), floor(500.0, 4.0))).unwrap();
        let config = GameConfig {
            start: SpawnPoint::new(GridCoord::new(1, 1), 100.0, 300.0),
            ..GameConfig::default()
        };
        let mut w = World::new(config, t).unwrap();
        w.player_mut().body.y_vel = 900.0;
        for _ in 0..20 {
            w.tick(0.1, idle()).unwrap();
        }
        assert_eq!(w.player().pos().y, 420.0);
    }

    #[test]
    fn i_frames_count_frames_on_slow_ticks() {
        let mut w = world();
        w.player_mut().take_damage(1);
        assert_eq!(w.player().i_frames(), 10);
        w.tick(1.0 / 30.0, idle()).unwrap();
        assert_eq!(w.player().i_frames(), 9);
    }

    #[test]
    fn dash_requires_cooldown() {
        let mut w = world();
        run(&mut w, 120, idle());
        w.tick(DT, FrameActions::pressed(Actions::DASH)).unwrap();
        assert!(w.player().body.is_tweening());
        assert!(w.player().dash_cooldown_remaining() > 0.0);
    }

    #[test]
    fn unknown_start_cell_fails() {
        let config = GameConfig {
            start: SpawnPoint::new(GridCoord::new(9, 9), 0.0, 0.0),
            ..GameConfig::default()
        };
        assert!(matches!(
            World::new(config, table()),
            Err(EngineError::StageNotFound { .. })
        ));
    }

    #[test]
    fn config_from_partial_json() {
        let config = GameConfig::from_json(r#"{ "gravity": 500, "player": { "speed": 300 } }"#).unwrap();
        assert_eq!(config.gravity, 500.0);
        assert_eq!(config.player.speed, 300.0);
        assert_eq!(config.player.jump_impulse, 500.0);
        assert_eq!(config.screen, Screen::new(1600.0, 900.0));
    }

    #[test]
    fn config_validation() {
        let mut config = GameConfig::default();
        config.player.health = 20;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        assert!(GameConfig::from_json(r#"{ "max_substeps": 0 }"#).is_err());
        // 5000px/s over 1/60s sinks 83px into a floor, deeper than the player is wide.
        assert!(matches!(
            GameConfig::from_json(r#"{ "max_fall_speed": 5000 }"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn render_draws_room_and_player() {
        let w = world();
        let mut buf = RenderBuffer::new();
        w.render(&mut buf);
        assert_eq!(buf.instance_count(), 2);
    }
}
