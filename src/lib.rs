//! Rock Drift - A wrap-around arena arcade simulation
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, entities, world tick, collisions, input intents)
//! - `settings`: Data-driven tuning and world configuration
//! - `runner`: Fixed-period driver that owns the world and drains queued input

pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::Session;
pub use settings::Settings;

use glam::DVec2;

/// Default tuning constants
pub mod consts {
    /// Arena dimensions
    pub const WORLD_WIDTH: f64 = 400.0;
    pub const WORLD_HEIGHT: f64 = 400.0;

    /// Tick period (10 Hz)
    pub const TICK_INTERVAL_MS: u64 = 100;

    /// Craft defaults
    pub const CRAFT_EXTENT: f64 = 25.0;
    /// 1.0 means no drag
    pub const CRAFT_DRAG: f64 = 0.99;
    pub const THRUST_FORCE: f64 = 1.0;
    /// Minimum seconds between two shots
    pub const FIRE_COOLDOWN_SECS: f64 = 0.2;

    /// Projectile defaults
    pub const PROJECTILE_EXTENT: f64 = 10.0;
    pub const PROJECTILE_SPEED: f64 = 10.0;
    pub const PROJECTILE_LIFE_SECS: f64 = 2.0;

    /// Obstacle extent is drawn from [min_side / 25, min_side / 10]
    pub const OBSTACLE_EXTENT_DIVISORS: (f64, f64) = (25.0, 10.0);
    /// Obstacle velocity per axis is drawn from this range
    pub const OBSTACLE_SPEED_RANGE: (f64, f64) = (1.0, 10.0);
    pub const INITIAL_OBSTACLES: u32 = 1;

    /// Log a world summary every N ticks
    pub const SUMMARY_EVERY_TICKS: u64 = 10;
}

/// Unit vector pointing along (x, y), or `None` for the zero vector
#[inline]
pub fn unit_vector(v: DVec2) -> Option<DVec2> {
    let mag = v.length();
    if mag > 0.0 && mag.is_finite() {
        Some(v / mag)
    } else {
        None
    }
}
