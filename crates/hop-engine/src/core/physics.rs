//! Arcade kinematics: gravity integration and rectangle collision resolution.
//!
//! No rigid-body solver. Each platform overlap is classified as a wall or a
//! floor/ceiling hit from the shape of a single intersection rectangle.

use crate::components::hitbox::Hitbox;
use crate::components::surfaces::{Collidable, LevelObject};
use crate::core::geometry::{Rect, Screen};

/// Default tie-break margin (px) favouring vertical resolution on near-square overlaps.
pub const DEFAULT_COLLISION_EPSILON: f32 = 3.0;

/// Default downward acceleration in px/s².
pub const DEFAULT_GRAVITY: f32 = 1000.0;

/// Default terminal fall speed in px/s. At 1/60 s steps a body sinks at most
/// 25px into a floor per step, well inside the floor branch of the classifier.
pub const DEFAULT_MAX_FALL_SPEED: f32 = 1500.0;

/// Constants every moving body is simulated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub screen: Screen,
    pub gravity: f32,
    /// Cap on downward velocity.
    pub max_fall_speed: f32,
    pub collision_epsilon: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            collision_epsilon: DEFAULT_COLLISION_EPSILON,
        }
    }
}

/// Which resolution branches an overlap triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapAxes {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Classify an intersection rectangle.
///
/// Tall overlaps (`height > width - epsilon`) are walls, wide ones
/// (`width - epsilon > height`) are floors or ceilings. The two tests are
/// evaluated independently; with a single overlap at most one holds, and
/// neither holds when `height == width - epsilon` exactly.
pub fn classify_overlap(overlap: &Rect, epsilon: f32) -> OverlapAxes {
    OverlapAxes {
        horizontal: overlap.height() > overlap.width() - epsilon,
        vertical: overlap.width() - epsilon > overlap.height(),
    }
}

/// What the platform pass did to the body this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformContacts {
    /// Snapped onto a platform top.
    pub landed: bool,
    /// Bumped into a platform bottom.
    pub ceiling: bool,
    /// Pushed out of a platform side.
    pub wall: bool,
}

/// `y += v*dt` after `v += g*dt` (semi-implicit Euler), with `v` capped at
/// `max_fall_speed` downward.
///
/// The cap matters for collision: a body that sinks deeper into a floor than
/// its own width minus the epsilon in one step is classified as a wall hit.
pub fn integrate_gravity(body: &mut Hitbox, gravity: f32, max_fall_speed: f32, dt: f32) {
    body.y_vel = (body.y_vel + gravity * dt).min(max_fall_speed);
    body.rect.pos.y += body.y_vel * dt;
}

/// Push `body` out of every solid, collision-enabled object it overlaps.
///
/// Walls halt any running tween at the resolved position. Floors and ceilings
/// pin the tween's vertical travel to the resolved height so it cannot drive
/// the body back into the obstruction next frame.
pub fn resolve_platforms<'a>(
    body: &mut Hitbox,
    platforms: impl IntoIterator<Item = &'a LevelObject>,
    epsilon: f32,
) -> PlatformContacts {
    let mut contacts = PlatformContacts::default();

    for platform in platforms {
        if !platform.is_solid() || !platform.collides() || !body.has_collision() {
            continue;
        }
        let solid = platform.hitbox().rect;
        let overlap = match body.rect.clip(&solid) {
            Some(o) => o,
            None => continue,
        };
        let axes = classify_overlap(&overlap, epsilon);

        if axes.horizontal {
            let r = body.rect;
            if r.right() > solid.left() && r.right() < solid.center_x() {
                body.rect.pos.x = solid.left() - r.width();
                body.interrupt_tween();
                contacts.wall = true;
            } else if r.left() < solid.right() && r.left() > solid.center_x() {
                body.rect.pos.x = solid.right();
                body.interrupt_tween();
                contacts.wall = true;
            }
        }

        if axes.vertical {
            let r = body.rect;
            if r.bottom() > solid.top() && r.top() < solid.top() {
                body.rect.pos.y = solid.top() - r.height();
                body.y_vel = 0.0;
                body.pin_tween_y(body.rect.pos.y);
                contacts.landed = true;
            } else if r.top() < solid.bottom() && r.bottom() > solid.bottom() {
                body.rect.pos.y = solid.bottom();
                body.y_vel = 0.0;
                body.pin_tween_y(body.rect.pos.y);
                contacts.ceiling = true;
            }
        }
    }

    contacts
}

/// Damage values of every damaging, collision-enabled object overlapping `area`, in group order.
///
/// `area` is the broad-phase rectangle: the body's position before platform
/// resolution, so a hazard flush inside a floor still hits on the landing step.
pub fn touched_hazards<'a>(
    area: &Rect,
    hazards: impl IntoIterator<Item = &'a LevelObject>,
) -> Vec<u32> {
    hazards
        .into_iter()
        .filter(|h| h.collides() && area.intersects(&h.hitbox().rect))
        .filter_map(|h| h.contact_damage())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::surfaces::{Lava, Platform, Spike};
    use crate::extensions::easing::Easing;
    use glam::Vec2;

    fn body(x: f32, y: f32) -> Hitbox {
        Hitbox::new(x, y, 50.0, 80.0).unwrap()
    }

    fn solid(x: f32, y: f32, w: f32, h: f32) -> LevelObject {
        Platform::new(x, y, w, h).unwrap().into()
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn classify_wide_and_tall() {
        let wide = classify_overlap(&rect(0.0, 0.0, 50.0, 5.0), 3.0);
        assert_eq!(wide, OverlapAxes { horizontal: false, vertical: true });
        let tall = classify_overlap(&rect(0.0, 0.0, 5.0, 50.0), 3.0);
        assert_eq!(tall, OverlapAxes { horizontal: true, vertical: false });
    }

    #[test]
    fn classify_square_corner_favours_wall() {
        // A 45 degree corner hit: equal overlap on both axes resolves as a wall.
        let square = classify_overlap(&rect(0.0, 0.0, 6.0, 6.0), 3.0);
        assert_eq!(square, OverlapAxes { horizontal: true, vertical: false });
        // Width must beat height by more than epsilon to count as a floor.
        let near = classify_overlap(&rect(0.0, 0.0, 9.5, 6.0), 3.0);
        assert!(near.vertical && !near.horizontal);
    }

    #[test]
    fn classify_exact_tie_fires_neither() {
        let tie = classify_overlap(&rect(0.0, 0.0, 9.0, 6.0), 3.0);
        assert_eq!(tie, OverlapAxes::default());
    }

    #[test]
    fn gravity_is_semi_implicit() {
        let mut b = body(0.0, 0.0);
        integrate_gravity(&mut b, 1000.0, 1500.0, 0.1);
        assert!((b.y_vel - 100.0).abs() < 1e-4);
        assert!((b.pos().y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn gravity_caps_fall_speed_only() {
        let mut b = body(0.0, 0.0);
        b.y_vel = 1490.0;
        integrate_gravity(&mut b, 1000.0, 1500.0, 0.1);
        assert_eq!(b.y_vel, 1500.0);
        assert!((b.pos().y - 150.0).abs() < 1e-3);

        let mut rising = body(0.0, 0.0);
        rising.y_vel = -3000.0;
        integrate_gravity(&mut rising, 1000.0, 1500.0, 0.1);
        assert!((rising.y_vel + 2900.0).abs() < 1e-3);
    }

    #[test]
    fn capped_fall_still_lands_on_floor() {
        // Uncapped, 3000px/s for 1/60s sinks 50px into the floor: a wall hit.
        let floor = solid(0.0, 500.0, 1600.0, 200.0);
        let mut b = body(400.0, 419.0);
        b.y_vel = 3000.0;
        integrate_gravity(&mut b, 1000.0, DEFAULT_MAX_FALL_SPEED, 1.0 / 60.0);
        let contacts = resolve_platforms(&mut b, [&floor], 3.0);
        assert!(contacts.landed && !contacts.wall);
        assert_eq!(b.pos(), Vec2::new(400.0, 420.0));
    }

    #[test]
    fn lands_on_top() {
        let mut b = body(0.0, 425.0);
        b.y_vel = 300.0;
        let contacts = resolve_platforms(&mut b, [&solid(0.0, 500.0, 200.0, 50.0)], 3.0);
        assert!(contacts.landed);
        assert_eq!(b.pos().y, 420.0);
        assert_eq!(b.y_vel, 0.0);
    }

    #[test]
    fn bumps_ceiling() {
        let mut b = body(0.0, 95.0);
        b.y_vel = -400.0;
        let contacts = resolve_platforms(&mut b, [&solid(0.0, 0.0, 200.0, 100.0)], 3.0);
        assert!(contacts.ceiling);
        assert_eq!(b.pos().y, 100.0);
        assert_eq!(b.y_vel, 0.0);
    }

    #[test]
    fn pushed_out_of_left_and_right_walls() {
        let wall = solid(300.0, 0.0, 150.0, 600.0);

        let mut from_left = body(255.0, 100.0);
        let c = resolve_platforms(&mut from_left, [&wall], 3.0);
        assert!(c.wall);
        assert_eq!(from_left.pos().x, 250.0);

        let mut from_right = body(445.0, 100.0);
        let c = resolve_platforms(&mut from_right, [&wall], 3.0);
        assert!(c.wall);
        assert_eq!(from_right.pos().x, 450.0);
    }

    #[test]
    fn wall_hit_halts_tween_at_resolved_position() {
        let wall = solid(300.0, 0.0, 150.0, 600.0);
        let mut b = body(255.0, 100.0);
        b.move_to(Vec2::new(600.0, 100.0), 1.0, Easing::Linear, false);
        resolve_platforms(&mut b, [&wall], 3.0);
        assert!(!b.is_tweening());
        assert_eq!(b.tween().target(), Vec2::new(250.0, 100.0));
    }

    #[test]
    fn floor_hit_pins_tween_height() {
        let floor = solid(0.0, 500.0, 1000.0, 50.0);
        let mut b = body(0.0, 425.0);
        b.move_to(Vec2::new(300.0, 600.0), 1.0, Easing::Linear, false);
        resolve_platforms(&mut b, [&floor], 3.0);
        assert!(b.is_tweening());
        assert_eq!(b.tween().target(), Vec2::new(300.0, 420.0));
        assert_eq!(b.tween().start().y, 420.0);
    }

    #[test]
    fn skips_when_either_side_has_no_collision() {
        let floor = solid(0.0, 500.0, 200.0, 50.0);
        let mut ghost = body(0.0, 425.0).with_collision(false);
        assert_eq!(resolve_platforms(&mut ghost, [&floor], 3.0), PlatformContacts::default());
        assert_eq!(ghost.pos().y, 425.0);

        let passable: LevelObject = Platform::passable(0.0, 500.0, 200.0, 50.0).unwrap().into();
        let mut b = body(0.0, 425.0);
        assert!(!resolve_platforms(&mut b, [&passable], 3.0).landed);
    }

    #[test]
    fn hazards_are_not_solid() {
        let spike: LevelObject = Spike::new(0.0, 500.0, 200.0, 50.0).unwrap().into();
        let mut b = body(0.0, 425.0);
        assert!(!resolve_platforms(&mut b, [&spike], 3.0).landed);
    }

    #[test]
    fn touched_hazards_reports_damage() {
        let spike: LevelObject = Spike::new(0.0, 70.0, 50.0, 50.0).unwrap().into();
        let lava: LevelObject = Lava::new(40.0, 0.0, 50.0, 50.0).unwrap().into();
        let far: LevelObject = Lava::new(500.0, 500.0, 50.0, 50.0).unwrap().into();
        let b = body(0.0, 0.0);
        assert_eq!(touched_hazards(&b.rect, [&spike, &lava, &far]), vec![1, 5]);

        let mut cold = spike.clone();
        cold.hitbox_mut().set_collision(false);
        assert!(touched_hazards(&b.rect, [&cold]).is_empty());
    }
}
