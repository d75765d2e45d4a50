//! The player aggregate: a physics [`Hitbox`] plus health, facing, room address
//! and the jump/dash cooldowns.

use glam::Vec2;

use crate::api::error::EngineError;
use crate::api::game::{PlayerConfig, SpawnPoint};
use crate::api::types::{GridCoord, StageKey};
use crate::components::hitbox::Hitbox;
use crate::core::physics::{self, Environment};
use crate::renderer::instance::{Drawable, RenderBuffer};
use crate::stage::{Stage, StageTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Which jump a press produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Ground,
    Double,
}

/// Result of a damage attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Immune: i-frames were running.
    Ignored,
    Damaged,
    /// Health reached zero; the player was moved to the respawn point.
    Killed,
}

/// A room change caused by crossing a screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GridCoord,
    pub to: GridCoord,
}

/// What happened to the player during one or more updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerEvents {
    pub landed: bool,
    pub bumped_ceiling: bool,
    pub hit_wall: bool,
    pub dash_finished: bool,
    /// Health actually lost (hits during i-frames do not count).
    pub damage_taken: u32,
    pub died: bool,
    pub transition: Option<Transition>,
}

impl PlayerEvents {
    /// Fold the events of a later sub-step into this one.
    pub fn merge(&mut self, later: PlayerEvents) {
        self.landed |= later.landed;
        self.bumped_ceiling |= later.bumped_ceiling;
        self.hit_wall |= later.hit_wall;
        self.dash_finished |= later.dash_finished;
        self.damage_taken += later.damage_taken;
        self.died |= later.died;
        if later.transition.is_some() {
            self.transition = later.transition;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Hitbox,
    pub speed: f32,
    on_ground: bool,
    double_jump_available: bool,
    facing: Facing,
    health: u32,
    max_health: u32,
    i_frames: u32,
    grid: GridCoord,
    stage_id: StageKey,
    jump_cooldown_remaining: f32,
    dash_cooldown_remaining: f32,
    respawn: SpawnPoint,
    config: PlayerConfig,
    env: Environment,
}

impl Player {
    /// Place a new player at `start`. Fails when the player's size is invalid
    /// or no stage is registered at the start cell.
    pub fn new(
        config: PlayerConfig,
        env: Environment,
        start: &SpawnPoint,
        respawn: SpawnPoint,
        table: &StageTable,
    ) -> Result<Self, EngineError> {
        let body = Hitbox::new(start.position.x, start.position.y, config.width, config.height)?
            .with_color(config.color);
        let stage_id = table.lookup_stage(start.grid)?.clone();
        Ok(Self {
            body,
            speed: config.speed,
            on_ground: false,
            double_jump_available: false,
            facing: Facing::Right,
            health: config.health.min(config.max_health),
            max_health: config.max_health,
            i_frames: 0,
            grid: start.grid,
            stage_id,
            jump_cooldown_remaining: 0.0,
            dash_cooldown_remaining: 0.0,
            respawn,
            config,
            env,
        })
    }

    // -- Accessors --

    pub fn pos(&self) -> Vec2 {
        self.body.pos()
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn double_jump_available(&self) -> bool {
        self.double_jump_available
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn i_frames(&self) -> u32 {
        self.i_frames
    }

    pub fn grid(&self) -> GridCoord {
        self.grid
    }

    pub fn stage_id(&self) -> &StageKey {
        &self.stage_id
    }

    pub fn jump_cooldown_remaining(&self) -> f32 {
        self.jump_cooldown_remaining
    }

    pub fn dash_cooldown_remaining(&self) -> f32 {
        self.dash_cooldown_remaining
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // -- Actions --

    pub fn move_left(&mut self, dt: f32) {
        self.body.rect.pos.x -= self.speed * dt;
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self, dt: f32) {
        self.body.rect.pos.x += self.speed * dt;
        self.facing = Facing::Right;
    }

    /// Ground jump: upward impulse, leaves the ground, arms the double jump.
    /// No-op while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.body.y_vel -= self.config.jump_impulse;
        self.on_ground = false;
        self.double_jump_available = true;
        true
    }

    /// Airborne jump, once per airborne period. Overwrites the vertical velocity.
    pub fn double_jump(&mut self) -> bool {
        if self.on_ground || !self.double_jump_available {
            return false;
        }
        self.body.y_vel = -self.config.double_jump_velocity;
        self.double_jump_available = false;
        log::debug!("Double jump at {:?}", self.body.pos());
        true
    }

    /// Held-jump handling: a ground jump when grounded, otherwise a double jump
    /// once the cooldown armed by the ground jump has run out.
    pub fn press_jump(&mut self) -> Option<Jump> {
        if self.jump() {
            self.jump_cooldown_remaining = self.config.jump_cooldown;
            return Some(Jump::Ground);
        }
        if self.jump_cooldown_remaining <= 0.0 && self.double_jump() {
            return Some(Jump::Double);
        }
        None
    }

    /// Tween `dash_distance` in the facing direction. Refused while the dash cooldown runs.
    pub fn dash(&mut self) -> bool {
        if self.dash_cooldown_remaining > 0.0 {
            return false;
        }
        let target = self.body.pos() + Vec2::new(self.facing.sign() * self.config.dash_distance, 0.0);
        self.body.move_to(
            target,
            self.config.dash_duration,
            self.config.dash_easing,
            self.config.dash_passes_through,
        );
        self.dash_cooldown_remaining = self.config.dash_cooldown;
        log::debug!("Dash {:?} towards {:?}", self.facing, target);
        true
    }

    /// Apply `damage` unless i-frames are running. At zero health the player
    /// is moved to the respawn point; there is no despawn.
    pub fn take_damage(&mut self, damage: u32) -> Hit {
        if self.i_frames > 0 {
            return Hit::Ignored;
        }
        self.health = self.health.saturating_sub(damage);
        self.i_frames = self.config.i_frames;
        log::debug!("Hit for {damage}, health {}/{}", self.health, self.max_health);
        if self.health == 0 {
            log::info!("Player died at grid {}, respawning at {}", self.grid, self.respawn.grid);
            let respawn = self.respawn;
            self.place(&respawn);
            return Hit::Killed;
        }
        Hit::Damaged
    }

    /// Move to `spawn` and resolve its stage. Health is left alone.
    pub fn teleport(&mut self, spawn: &SpawnPoint, table: &StageTable) -> Result<(), EngineError> {
        let stage_id = table.lookup_stage(spawn.grid)?.clone();
        self.place(spawn);
        self.stage_id = stage_id;
        Ok(())
    }

    /// Back to `spawn` with full health and cleared timers.
    pub fn reset(&mut self, spawn: &SpawnPoint, table: &StageTable) -> Result<(), EngineError> {
        self.teleport(spawn, table)?;
        self.health = self.max_health;
        self.i_frames = 0;
        self.jump_cooldown_remaining = 0.0;
        self.dash_cooldown_remaining = 0.0;
        self.double_jump_available = false;
        self.facing = Facing::Right;
        Ok(())
    }

    fn place(&mut self, spawn: &SpawnPoint) {
        self.body.interrupt_tween();
        self.body.set_pos(spawn.position);
        self.body.y_vel = 0.0;
        self.on_ground = false;
        self.grid = spawn.grid;
    }

    // -- Simulation --

    /// A whole frame in one step: [`step`](Self::step) then [`end_frame`](Self::end_frame).
    pub fn update(
        &mut self,
        dt: f32,
        stage: &Stage,
        table: &StageTable,
    ) -> Result<PlayerEvents, EngineError> {
        let events = self.step(dt, stage, table)?;
        self.end_frame();
        Ok(events)
    }

    /// One simulation step against the current stage. The stage id is
    /// re-derived from the grid address at the end; a miss is a level-data error,
    /// and so is walking into a special room.
    ///
    /// Platforms and hazards are both tested against the position reached
    /// before platform resolution. Frame-counted timers are left to `end_frame`.
    pub fn step(
        &mut self,
        dt: f32,
        stage: &Stage,
        table: &StageTable,
    ) -> Result<PlayerEvents, EngineError> {
        let mut events = PlayerEvents::default();

        physics::integrate_gravity(&mut self.body, self.env.gravity, self.env.max_fall_speed, dt);
        self.on_ground = false;

        events.dash_finished = self.body.advance_tween(dt);
        let broad = self.body.rect;

        let contacts = physics::resolve_platforms(
            &mut self.body,
            stage.platforms.objects(),
            self.env.collision_epsilon,
        );
        if contacts.landed {
            self.on_ground = true;
            self.double_jump_available = true;
        }
        events.landed = contacts.landed;
        events.bumped_ceiling = contacts.ceiling;
        events.hit_wall = contacts.wall;

        let hazards = stage
            .spikes
            .iter()
            .chain(stage.hazard_liquid.iter())
            .flat_map(|group| group.objects());
        let touched = if self.body.has_collision() {
            physics::touched_hazards(&broad, hazards)
        } else {
            Vec::new()
        };
        for damage in touched {
            self.body.y_vel = -self.config.knockback_velocity;
            let before = self.health;
            match self.take_damage(damage) {
                Hit::Ignored => {}
                Hit::Damaged => events.damage_taken += before - self.health,
                Hit::Killed => {
                    events.damage_taken += before;
                    events.died = true;
                    break;
                }
            }
        }

        events.transition = self.cross_room_edge();

        self.stage_id = match events.transition {
            Some(_) => table.lookup_regular(self.grid)?.clone(),
            None => table.lookup_stage(self.grid)?.clone(),
        };
        if let Some(t) = events.transition {
            log::info!("Room transition: grid {} -> {}, stage {}", t.from, t.to, self.stage_id);
        }

        self.jump_cooldown_remaining = (self.jump_cooldown_remaining - dt).max(0.0);
        self.dash_cooldown_remaining = (self.dash_cooldown_remaining - dt).max(0.0);

        Ok(events)
    }

    /// Close a frame. I-frames count frames, not sub-steps.
    pub fn end_frame(&mut self) {
        self.i_frames = self.i_frames.saturating_sub(1);
    }

    /// Wrap to the opposite edge when the body leaves the screen.
    /// Only the first crossed edge counts: right, left, up, down.
    fn cross_room_edge(&mut self) -> Option<Transition> {
        let screen = self.env.screen;
        let rect = self.body.rect;
        let (dx, dy) = if rect.off_screen_right(&screen) {
            (1, 0)
        } else if rect.off_screen_left() {
            (-1, 0)
        } else if rect.off_screen_up() {
            (0, -1)
        } else if rect.off_screen_down(&screen) {
            (0, 1)
        } else {
            return None;
        };

        self.body.interrupt_tween();
        match (dx, dy) {
            (1, _) => self.body.rect.pos.x = 0.0,
            (-1, _) => self.body.rect.pos.x = screen.width - rect.width(),
            (_, -1) => self.body.rect.pos.y = screen.height - rect.height(),
            _ => self.body.rect.pos.y = 0.0,
        }
        let from = self.grid;
        self.grid = from.offset(dx, dy);
        Some(Transition { from, to: self.grid })
    }
}

impl Drawable for Player {
    fn draw(&self, target: &mut RenderBuffer) {
        self.body.draw(target);
    }
}
