//! Kinematic body shared by every movable entity
//!
//! Velocities are in world units per tick; the integration step carries no
//! time scale.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::surface::Tint;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Closed-interval intersection test (touching edges overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Position, velocity, acceleration, drag and bounding extent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner of the bounding box
    pub pos: DVec2,
    pub vel: DVec2,
    pub accel: DVec2,
    /// Per-tick velocity multiplier (1.0 = no decay)
    pub drag: f64,
    /// Edge length of the square bounding box
    pub extent: f64,
    /// Cosmetic only
    pub tint: Tint,
}

impl Body {
    /// A body at rest at `pos`
    pub fn at_rest(pos: DVec2, extent: f64, drag: f64, tint: Tint) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            accel: DVec2::ZERO,
            drag,
            extent,
            tint,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.pos + DVec2::splat(self.extent))
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec2 {
        self.pos + DVec2::splat(self.extent / 2.0)
    }

    /// Advance one tick inside a toroidal arena of size `arena`
    pub fn integrate(&mut self, arena: DVec2) {
        self.vel += self.accel;
        self.vel *= self.drag;
        self.pos += self.vel;
        self.wrap(arena);
    }

    /// Single-step toroidal correction per axis
    fn wrap(&mut self, arena: DVec2) {
        let half = self.extent / 2.0;
        self.pos.x = wrap_axis(self.pos.x, half, arena.x);
        self.pos.y = wrap_axis(self.pos.y, half, arena.y);
    }
}

/// Keeps `value` in [-half, size - half) assuming it moved less than `size`
#[inline]
fn wrap_axis(value: f64, half: f64, size: f64) -> f64 {
    if value < -half {
        let wrapped = value + size;
        // Just below -half, the sum can round up onto the open upper edge
        if wrapped >= size - half {
            -half
        } else {
            wrapped
        }
    } else if value >= size - half {
        value - size
    } else {
        value
    }
}
