//! Craft intent state: held thrust keys and fire cooldown

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::unit_vector;

/// A thrust direction (screen coordinates, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 8,
        }
    }
}

/// Directions currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn press(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn release(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Net direction on each axis in {-1, 0, 1}; opposing keys cancel
    pub fn axes(&self) -> (i8, i8) {
        let x = self.contains(Direction::Right) as i8 - self.contains(Direction::Left) as i8;
        let y = self.contains(Direction::Down) as i8 - self.contains(Direction::Up) as i8;
        (x, y)
    }
}

/// Per-craft state that lives beside its [`Body`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftState {
    /// Tick of the last successful shot (construction tick initially)
    pub last_fire_tick: u64,
    pub held: HeldKeys,
}

impl CraftState {
    pub fn new(tick: u64) -> Self {
        Self {
            last_fire_tick: tick,
            held: HeldKeys::default(),
        }
    }

    /// Point one axis toward `thrust`, leaving the other axis as it is;
    /// `None` releases every key.
    pub fn set_thrust(&mut self, body: &mut Body, thrust: Option<Direction>, force: f64) {
        match thrust {
            Some(dir) => {
                self.held.release(dir.opposite());
                self.held.press(dir);
            }
            None => self.held = HeldKeys::default(),
        }
        self.apply_held(body, force);
    }

    pub fn press(&mut self, body: &mut Body, dir: Direction, force: f64) {
        self.held.press(dir);
        self.apply_held(body, force);
    }

    pub fn release(&mut self, body: &mut Body, dir: Direction, force: f64) {
        self.held.release(dir);
        self.apply_held(body, force);
    }

    /// Recompute acceleration from the whole held set
    fn apply_held(&self, body: &mut Body, force: f64) {
        let (x, y) = self.held.axes();
        body.accel = DVec2::new(x as f64 * force, y as f64 * force);
    }

    /// Direction to fire in, if the craft is moving and more than
    /// `cooldown_ticks` have passed since the last shot.
    ///
    /// Velocity is checked before anything is normalized.
    pub fn fire_direction(
        &self,
        body: &Body,
        now_tick: u64,
        cooldown_ticks: u64,
    ) -> Option<DVec2> {
        if body.vel == DVec2::ZERO {
            return None;
        }
        if now_tick.saturating_sub(self.last_fire_tick) <= cooldown_ticks {
            return None;
        }
        unit_vector(body.vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::surface::Tint;
    use proptest::prelude::*;

    fn craft_body() -> Body {
        Body::at_rest(DVec2::new(200.0, 200.0), 25.0, 0.99, Tint::White)
    }

    #[test]
    fn test_set_thrust_overwrites_one_axis() {
        let mut body = craft_body();
        let mut craft = CraftState::new(0);
        craft.set_thrust(&mut body, Some(Direction::Up), 1.0);
        craft.set_thrust(&mut body, Some(Direction::Right), 1.0);
        assert_eq!(body.accel, DVec2::new(1.0, -1.0));
        craft.set_thrust(&mut body, Some(Direction::Left), 1.0);
        assert_eq!(body.accel, DVec2::new(-1.0, -1.0));
        craft.set_thrust(&mut body, Some(Direction::Down), 1.0);
        assert_eq!(body.accel, DVec2::new(-1.0, 1.0));
        craft.set_thrust(&mut body, None, 1.0);
        assert_eq!(body.accel, DVec2::ZERO);
        assert!(craft.held.is_empty());
    }

    #[test]
    fn test_releasing_one_key_keeps_the_other() {
        let mut body = craft_body();
        let mut craft = CraftState::new(0);
        craft.press(&mut body, Direction::Up, 1.0);
        craft.press(&mut body, Direction::Left, 1.0);
        assert_eq!(body.accel, DVec2::new(-1.0, -1.0));
        craft.release(&mut body, Direction::Up, 1.0);
        assert_eq!(body.accel, DVec2::new(-1.0, 0.0));
        craft.release(&mut body, Direction::Left, 1.0);
        assert_eq!(body.accel, DVec2::ZERO);
        assert!(craft.held.is_empty());
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut body = craft_body();
        let mut craft = CraftState::new(0);
        craft.press(&mut body, Direction::Left, 1.0);
        craft.press(&mut body, Direction::Right, 1.0);
        assert_eq!(body.accel, DVec2::ZERO);
        craft.release(&mut body, Direction::Left, 1.0);
        assert_eq!(body.accel, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_cannot_fire_at_rest() {
        let body = craft_body();
        let craft = CraftState::new(0);
        assert!(craft.fire_direction(&body, 100, 2).is_none());
    }

    #[test]
    fn test_fire_direction_respects_cooldown() {
        let mut body = craft_body();
        body.vel = DVec2::new(3.0, 4.0);
        let craft = CraftState::new(10);
        assert!(craft.fire_direction(&body, 10, 2).is_none());
        assert!(craft.fire_direction(&body, 11, 2).is_none());
        assert!(craft.fire_direction(&body, 12, 2).is_none());
        let dir = craft.fire_direction(&body, 13, 2).unwrap();
        assert!((dir - DVec2::new(0.6, 0.8)).length() < 1e-12);
    }

    proptest! {
        #[test]
        fn test_cooldown_boundary_independent_of_last_shot(
            last in 0u64..100_000,
            cooldown in 0u64..50,
        ) {
            let mut body = craft_body();
            body.vel = DVec2::new(1.0, 0.0);
            let craft = CraftState::new(last);
            prop_assert!(craft.fire_direction(&body, last + cooldown, cooldown).is_none());
            prop_assert!(craft.fire_direction(&body, last + cooldown + 1, cooldown).is_some());
        }
    }
}
