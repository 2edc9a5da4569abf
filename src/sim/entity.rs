//! Entities: identity, kind tag and per-kind data

use std::fmt;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::craft::CraftState;
use super::surface::{Shape, Tint};
use crate::settings::Settings;

/// Stable arena index of a live entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tag used by collision resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Craft,
    Projectile,
    Obstacle,
}

/// Kind-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Role {
    Craft(CraftState),
    /// Tick at creation
    Projectile { born_tick: u64 },
    Obstacle,
}

impl Role {
    pub fn kind(&self) -> EntityKind {
        match self {
            Role::Craft(_) => EntityKind::Craft,
            Role::Projectile { .. } => EntityKind::Projectile,
            Role::Obstacle => EntityKind::Obstacle,
        }
    }
}

/// A live entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub role: Role,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.role.kind()
    }

    pub fn shape(&self) -> Shape {
        Shape::Oval {
            fill: self.body.tint,
        }
    }

    /// True once more than `life_ticks` ticks have passed since a
    /// projectile was created
    pub fn expired(&self, now_tick: u64, life_ticks: u64) -> bool {
        match self.role {
            Role::Projectile { born_tick } => now_tick.saturating_sub(born_tick) > life_ticks,
            _ => false,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{:?}{}: x={:.2}, y={:.2}, vx={:.2}, vy={:.2}>",
            self.kind(),
            self.id,
            self.body.pos.x,
            self.body.pos.y,
            self.body.vel.x,
            self.body.vel.y
        )
    }
}

/// Craft body at the arena center, at rest
pub fn craft_body(settings: &Settings) -> Body {
    let center = DVec2::new(settings.world_width / 2.0, settings.world_height / 2.0);
    Body::at_rest(center, settings.craft_extent, settings.craft_drag, Tint::White)
}

/// Projectile body at `pos` travelling along the unit vector `dir`
pub fn projectile_body(settings: &Settings, pos: DVec2, dir: DVec2) -> Body {
    let mut body = Body::at_rest(pos, settings.projectile_extent, 1.0, Tint::Red);
    body.vel = dir * settings.projectile_speed;
    body
}

/// Obstacle body with randomized extent, position and velocity
pub fn obstacle_body(settings: &Settings, rng: &mut impl Rng) -> Body {
    let (min_extent, max_extent) = settings.obstacle_extent_range();
    let (min_speed, max_speed) = settings.obstacle_speed_range;

    let extent = rng.random_range(min_extent..=max_extent);
    let pos = DVec2::new(
        rng.random_range(0.0..settings.world_width),
        rng.random_range(0.0..settings.world_height),
    );
    let mut body = Body::at_rest(pos, extent, 1.0, Tint::Grey);
    body.vel = DVec2::new(
        rng.random_range(min_speed..=max_speed),
        rng.random_range(min_speed..=max_speed),
    );
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_draws_within_ranges() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..500 {
            let body = obstacle_body(&settings, &mut rng);
            assert!((16.0..=40.0).contains(&body.extent));
            assert!((0.0..400.0).contains(&body.pos.x));
            assert!((0.0..400.0).contains(&body.pos.y));
            assert!((1.0..=10.0).contains(&body.vel.x));
            assert!((1.0..=10.0).contains(&body.vel.y));
            assert_eq!(body.accel, DVec2::ZERO);
            assert_eq!(body.drag, 1.0);
        }
    }

    #[test]
    fn test_obstacle_draws_in_tiny_world() {
        let settings = Settings {
            world_width: 0.5,
            world_height: 0.25,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let body = obstacle_body(&settings, &mut rng);
        assert!(body.extent > 0.0);
        assert!(body.pos.x < 0.5 && body.pos.y < 0.25);
    }

    #[test]
    fn test_projectile_body() {
        let settings = Settings::default();
        let body = projectile_body(&settings, DVec2::new(5.0, 6.0), DVec2::new(0.6, 0.8));
        assert!((body.vel - DVec2::new(6.0, 8.0)).length() < 1e-12);
        assert_eq!(body.drag, 1.0);
        assert_eq!(body.extent, settings.projectile_extent);
        assert_eq!(body.tint, Tint::Red);
    }

    #[test]
    fn test_only_projectiles_expire() {
        let settings = Settings::default();
        let projectile = Entity {
            id: EntityId(1),
            body: projectile_body(&settings, DVec2::ZERO, DVec2::X),
            role: Role::Projectile { born_tick: 5 },
        };
        assert!(!projectile.expired(5, 20));
        assert!(!projectile.expired(24, 20));
        assert!(!projectile.expired(25, 20));
        assert!(projectile.expired(26, 20));

        let obstacle = Entity {
            id: EntityId(2),
            body: Body::at_rest(DVec2::ZERO, 20.0, 1.0, Tint::Grey),
            role: Role::Obstacle,
        };
        assert!(!obstacle.expired(u64::MAX, 20));
    }

    #[test]
    fn test_display() {
        let settings = Settings::default();
        let craft = Entity {
            id: EntityId(1),
            body: craft_body(&settings),
            role: Role::Craft(CraftState::new(0)),
        };
        assert_eq!(
            craft.to_string(),
            "<Craft#1: x=200.00, y=200.00, vx=0.00, vy=0.00>"
        );
    }
}
