//! Static level geometry: solid platforms and damaging hazards.
//!
//! Every object is a thin wrapper over a [`Hitbox`]. The closed [`LevelObject`]
//! set is what groups store; systems talk to it through [`Collidable`].

use crate::api::error::EngineError;
use crate::api::types::Color;
use crate::components::hitbox::Hitbox;
use crate::renderer::instance::{Drawable, RenderBuffer, Shape};

/// Capability shared by everything a moving body can run into.
pub trait Collidable {
    fn hitbox(&self) -> &Hitbox;

    fn hitbox_mut(&mut self) -> &mut Hitbox;

    /// Solid objects block movement.
    fn is_solid(&self) -> bool {
        false
    }

    /// Damage dealt on contact, `None` for harmless objects.
    fn contact_damage(&self) -> Option<u32> {
        None
    }

    /// True when collision is enabled on this object.
    fn collides(&self) -> bool {
        self.hitbox().has_collision()
    }
}

/// Solid static obstacle.
#[derive(Debug, Clone)]
pub struct Platform {
    pub hitbox: Hitbox,
}

impl Platform {
    pub const DEFAULT_COLOR: Color = Color::BLUE;

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        Ok(Self {
            hitbox: Hitbox::new(x, y, width, height)?.with_color(Self::DEFAULT_COLOR),
        })
    }

    /// A platform without collision: drawn, but walkable through.
    pub fn passable(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        let mut platform = Self::new(x, y, width, height)?;
        platform.hitbox.set_collision(false);
        Ok(platform)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.hitbox.color = color;
        self
    }
}

/// Damaging spike strip. Drawn as a triangle.
#[derive(Debug, Clone)]
pub struct Spike {
    pub hitbox: Hitbox,
    pub damage: u32,
}

impl Spike {
    pub const DEFAULT_DAMAGE: u32 = 1;
    pub const DEFAULT_COLOR: Color = Color::ORANGE;

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        Ok(Self {
            hitbox: Hitbox::new(x, y, width, height)?.with_color(Self::DEFAULT_COLOR),
            damage: Self::DEFAULT_DAMAGE,
        })
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }
}

/// Damaging hazard liquid.
#[derive(Debug, Clone)]
pub struct Lava {
    pub hitbox: Hitbox,
    pub damage: u32,
}

impl Lava {
    pub const DEFAULT_DAMAGE: u32 = 5;
    pub const DEFAULT_COLOR: Color = Color::LAVA;

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        Ok(Self {
            hitbox: Hitbox::new(x, y, width, height)?.with_color(Self::DEFAULT_COLOR),
            damage: Self::DEFAULT_DAMAGE,
        })
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }
}

/// The closed set of level objects a [`Group`](crate::components::group::Group) can hold.
#[derive(Debug, Clone)]
pub enum LevelObject {
    Platform(Platform),
    Spike(Spike),
    Lava(Lava),
}

impl LevelObject {
    /// Lower-case kind name, used as the base of group member names.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LevelObject::Platform(_) => "platform",
            LevelObject::Spike(_) => "spike",
            LevelObject::Lava(_) => "lava",
        }
    }
}

impl Collidable for LevelObject {
    fn hitbox(&self) -> &Hitbox {
        match self {
            LevelObject::Platform(p) => &p.hitbox,
            LevelObject::Spike(s) => &s.hitbox,
            LevelObject::Lava(l) => &l.hitbox,
        }
    }

    fn hitbox_mut(&mut self) -> &mut Hitbox {
        match self {
            LevelObject::Platform(p) => &mut p.hitbox,
            LevelObject::Spike(s) => &mut s.hitbox,
            LevelObject::Lava(l) => &mut l.hitbox,
        }
    }

    fn is_solid(&self) -> bool {
        matches!(self, LevelObject::Platform(_))
    }

    fn contact_damage(&self) -> Option<u32> {
        match self {
            LevelObject::Platform(_) => None,
            LevelObject::Spike(s) => Some(s.damage),
            LevelObject::Lava(l) => Some(l.damage),
        }
    }
}

impl Drawable for LevelObject {
    fn draw(&self, target: &mut RenderBuffer) {
        let shape = match self {
            LevelObject::Spike(_) => Shape::Triangle,
            _ => Shape::Rect,
        };
        target.push(self.hitbox().render_instance(shape));
    }
}

impl From<Platform> for LevelObject {
    fn from(p: Platform) -> Self {
        LevelObject::Platform(p)
    }
}

impl From<Spike> for LevelObject {
    fn from(s: Spike) -> Self {
        LevelObject::Spike(s)
    }
}

impl From<Lava> for LevelObject {
    fn from(l: Lava) -> Self {
        LevelObject::Lava(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_is_solid_and_harmless() {
        let obj: LevelObject = Platform::new(0.0, 500.0, 200.0, 50.0).unwrap().into();
        assert!(obj.is_solid());
        assert!(obj.collides());
        assert_eq!(obj.contact_damage(), None);
        assert_eq!(obj.kind_name(), "platform");
    }

    #[test]
    fn hazards_carry_configurable_damage() {
        let spike: LevelObject = Spike::new(0.0, 0.0, 50.0, 50.0).unwrap().into();
        let lava: LevelObject = Lava::new(0.0, 0.0, 300.0, 100.0).unwrap().into();
        let hot: LevelObject = Lava::new(0.0, 0.0, 10.0, 10.0).unwrap().with_damage(9).into();
        assert_eq!(spike.contact_damage(), Some(1));
        assert_eq!(lava.contact_damage(), Some(5));
        assert_eq!(hot.contact_damage(), Some(9));
        assert!(!spike.is_solid());
    }

    #[test]
    fn passable_platform_has_no_collision() {
        let p = Platform::passable(0.0, 450.0, 50.0, 350.0).unwrap();
        assert!(!p.hitbox.has_collision());
    }

    #[test]
    fn spikes_draw_as_triangles() {
        let mut buf = RenderBuffer::new();
        LevelObject::from(Spike::new(0.0, 0.0, 50.0, 50.0).unwrap()).draw(&mut buf);
        LevelObject::from(Platform::new(0.0, 0.0, 50.0, 50.0).unwrap()).draw(&mut buf);
        assert_eq!(buf.instances[0].shape, Shape::Triangle.as_f32());
        assert_eq!(buf.instances[1].shape, Shape::Rect.as_f32());
    }

    #[test]
    fn construction_validates_dimensions() {
        assert!(Platform::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(Spike::new(0.0, 0.0, 10.0, 0.0).is_err());
        assert!(Lava::new(0.0, 0.0, -1.0, 1.0).is_err());
    }
}
