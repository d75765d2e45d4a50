use std::collections::HashMap;

use crate::api::types::Color;
use crate::components::surfaces::{Collidable, LevelObject};
use crate::renderer::instance::{Drawable, RenderBuffer};

/// Attribute changes applied to every member of a group. `None` leaves a field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObjectPatch {
    pub has_collision: Option<bool>,
    pub color: Option<Color>,
}

/// Insertion-ordered, named collection of level objects.
///
/// Names come from the object kind and are deduplicated with a numeric suffix:
/// `platform`, `platform_1`, `platform_2`, ... Counters survive `remove` so a
/// name is never handed out twice, and reset on `clear`.
///
/// Mutating membership while iterating is ruled out by the borrow checker.
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: Vec<(String, LevelObject)>,
    name_counts: HashMap<&'static str, usize>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: impl IntoIterator<Item = LevelObject>) -> Self {
        let mut group = Self::new();
        for object in objects {
            group.add(object);
        }
        group
    }

    /// Add an object, returning its generated name.
    pub fn add(&mut self, object: impl Into<LevelObject>) -> &str {
        let object = object.into();
        let kind = object.kind_name();
        let name = match self.name_counts.get(kind).copied() {
            Some(count) => {
                self.name_counts.insert(kind, count + 1);
                format!("{kind}_{}", count + 1)
            }
            None => {
                self.name_counts.insert(kind, 0);
                kind.to_string()
            }
        };
        self.members.push((name, object));
        &self.members[self.members.len() - 1].0
    }

    /// Remove an object by name, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<LevelObject> {
        let idx = self.members.iter().position(|(n, _)| n == name)?;
        Some(self.members.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&LevelObject> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LevelObject> {
        self.members.iter_mut().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate `(name, object)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelObject)> {
        self.members.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut LevelObject)> {
        self.members.iter_mut().map(|(n, o)| (n.as_str(), o))
    }

    /// Iterate the objects alone, in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &LevelObject> {
        self.members.iter().map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.name_counts.clear();
    }

    /// Apply the same attribute changes to every member.
    pub fn update(&mut self, patch: ObjectPatch) {
        for (_, object) in self.members.iter_mut() {
            let hitbox = object.hitbox_mut();
            if let Some(enabled) = patch.has_collision {
                hitbox.set_collision(enabled);
            }
            if let Some(color) = patch.color {
                hitbox.color = color;
            }
        }
    }

    pub fn set_collision(&mut self, enabled: bool) {
        self.update(ObjectPatch {
            has_collision: Some(enabled),
            ..Default::default()
        });
    }
}

impl Drawable for Group {
    fn draw(&self, target: &mut RenderBuffer) {
        for object in self.objects() {
            object.draw(target);
        }
    }
}

impl FromIterator<LevelObject> for Group {
    fn from_iter<I: IntoIterator<Item = LevelObject>>(iter: I) -> Self {
        Self::from_objects(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::surfaces::{Lava, Platform, Spike};

    fn platform(x: f32) -> Platform {
        Platform::new(x, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn names_are_deduplicated_per_kind() {
        let mut group = Group::new();
        assert_eq!(group.add(platform(0.0)), "platform");
        assert_eq!(group.add(platform(10.0)), "platform_1");
        assert_eq!(group.add(Spike::new(0.0, 0.0, 5.0, 5.0).unwrap()), "spike");
        assert_eq!(group.add(platform(20.0)), "platform_2");
        assert_eq!(group.len(), 4);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let group: Group = [
            LevelObject::from(platform(0.0)),
            LevelObject::from(Lava::new(0.0, 0.0, 5.0, 5.0).unwrap()),
            LevelObject::from(platform(30.0)),
        ]
        .into_iter()
        .collect();
        let names: Vec<&str> = group.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["platform", "lava", "platform_1"]);
    }

    #[test]
    fn remove_does_not_reuse_names() {
        let mut group = Group::new();
        group.add(platform(0.0));
        group.add(platform(10.0));
        assert!(group.remove("platform").is_some());
        assert!(!group.contains_name("platform"));
        assert_eq!(group.add(platform(20.0)), "platform_2");
        assert!(group.remove("missing").is_none());
    }

    #[test]
    fn clear_resets_names() {
        let mut group = Group::new();
        group.add(platform(0.0));
        group.add(platform(10.0));
        group.clear();
        assert!(group.is_empty());
        assert_eq!(group.add(platform(0.0)), "platform");
    }

    #[test]
    fn bulk_update_touches_every_member() {
        let mut group = Group::from_objects([platform(0.0).into(), platform(10.0).into()]);
        group.update(ObjectPatch {
            has_collision: Some(false),
            color: Some(Color::WHITE),
        });
        for object in group.objects() {
            assert!(!object.collides());
            assert_eq!(object.hitbox().color, Color::WHITE);
        }
        group.set_collision(true);
        assert!(group.objects().all(|o| o.collides()));
    }

    #[test]
    fn get_mut_allows_moving_a_member() {
        let mut group = Group::from_objects([platform(0.0).into()]);
        group
            .get_mut("platform")
            .unwrap()
            .hitbox_mut()
            .rect
            .pos
            .x = 99.0;
        assert_eq!(group.get("platform").unwrap().hitbox().rect.x(), 99.0);
    }

    #[test]
    fn draw_emits_every_member() {
        let group = Group::from_objects([platform(0.0).into(), platform(10.0).into()]);
        let mut buf = RenderBuffer::new();
        group.draw(&mut buf);
        assert_eq!(buf.instance_count(), 2);
    }
}
