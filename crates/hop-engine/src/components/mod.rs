pub mod group;
pub mod hitbox;
pub mod surfaces;
