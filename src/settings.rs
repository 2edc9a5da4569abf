//! World configuration and gameplay tuning
//!
//! Loaded from a JSON file; missing fields take their defaults from
//! [`crate::consts`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// World dimensions, tick rate and entity tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Toroidal arena width
    pub world_width: f64,
    /// Toroidal arena height
    pub world_height: f64,
    /// Fixed tick period in milliseconds
    pub tick_interval_ms: u64,
    /// Seed for obstacle spawn draws
    pub seed: u64,
    /// Obstacles created at construction (kept constant by respawns)
    pub initial_obstacles: u32,

    // === Craft ===
    pub craft_extent: f64,
    pub craft_drag: f64,
    pub thrust_force: f64,
    pub fire_cooldown_secs: f64,

    // === Projectiles ===
    pub projectile_extent: f64,
    pub projectile_speed: f64,
    pub projectile_life_secs: f64,
    /// Whether a projectile is removed when it destroys an obstacle
    pub projectile_consumed_on_hit: bool,

    // === Obstacles ===
    /// (larger, smaller) divisors applied to the shorter world side
    pub obstacle_extent_divisors: (f64, f64),
    /// Per-axis speed range
    pub obstacle_speed_range: (f64, f64),

    // === Driver ===
    pub summary_every_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: 0x5eed,
            initial_obstacles: INITIAL_OBSTACLES,

            craft_extent: CRAFT_EXTENT,
            craft_drag: CRAFT_DRAG,
            thrust_force: THRUST_FORCE,
            fire_cooldown_secs: FIRE_COOLDOWN_SECS,

            projectile_extent: PROJECTILE_EXTENT,
            projectile_speed: PROJECTILE_SPEED,
            projectile_life_secs: PROJECTILE_LIFE_SECS,
            projectile_consumed_on_hit: true,

            obstacle_extent_divisors: OBSTACLE_EXTENT_DIVISORS,
            obstacle_speed_range: OBSTACLE_SPEED_RANGE,

            summary_every_ticks: SUMMARY_EVERY_TICKS,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Malformed settings file {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Cannot read settings file {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Replace values that would make the simulation degenerate with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.world_width > 0.0 && self.world_width.is_finite()) {
            log::warn!("world_width {} rejected", self.world_width);
            self.world_width = defaults.world_width;
        }
        if !(self.world_height > 0.0 && self.world_height.is_finite()) {
            log::warn!("world_height {} rejected", self.world_height);
            self.world_height = defaults.world_height;
        }
        if self.tick_interval_ms == 0 {
            log::warn!("tick_interval_ms 0 rejected");
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        if !(0.0..=1.0).contains(&self.craft_drag) {
            log::warn!("craft_drag {} outside [0, 1] rejected", self.craft_drag);
            self.craft_drag = defaults.craft_drag;
        }
        for (name, value, fallback) in [
            ("craft_extent", &mut self.craft_extent, defaults.craft_extent),
            ("thrust_force", &mut self.thrust_force, defaults.thrust_force),
            ("projectile_extent", &mut self.projectile_extent, defaults.projectile_extent),
            ("projectile_speed", &mut self.projectile_speed, defaults.projectile_speed),
        ] {
            if !(*value > 0.0 && value.is_finite()) {
                log::warn!("{name} {value} rejected");
                *value = fallback;
            }
        }
        if !(self.fire_cooldown_secs >= 0.0) {
            log::warn!("fire_cooldown_secs {} rejected", self.fire_cooldown_secs);
            self.fire_cooldown_secs = defaults.fire_cooldown_secs;
        }
        if !(self.projectile_life_secs >= 0.0) {
            log::warn!("projectile_life_secs {} rejected", self.projectile_life_secs);
            self.projectile_life_secs = defaults.projectile_life_secs;
        }

        let (big, small) = self.obstacle_extent_divisors;
        if !(small > 0.0 && big > small) {
            log::warn!("obstacle_extent_divisors {:?} rejected", self.obstacle_extent_divisors);
            self.obstacle_extent_divisors = defaults.obstacle_extent_divisors;
        }
        let (lo, hi) = self.obstacle_speed_range;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            log::warn!("obstacle_speed_range {:?} rejected", self.obstacle_speed_range);
            self.obstacle_speed_range = defaults.obstacle_speed_range;
        }
        if self.summary_every_ticks == 0 {
            self.summary_every_ticks = defaults.summary_every_ticks;
        }

        self
    }

    /// Simulated seconds that elapse per tick
    pub fn tick_seconds(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }

    /// Whole ticks covered by `secs`; a span within 1e-9 ticks of the next
    /// whole tick counts as reaching it
    pub fn secs_to_ticks(&self, secs: f64) -> u64 {
        let ticks = secs * 1000.0 / self.tick_interval_ms as f64;
        (ticks + 1e-9).floor().max(0.0) as u64
    }

    /// A projectile lives while at most this many ticks have elapsed
    pub fn projectile_life_ticks(&self) -> u64 {
        self.secs_to_ticks(self.projectile_life_secs)
    }

    /// Shots must be more than this many ticks apart
    pub fn fire_cooldown_ticks(&self) -> u64 {
        self.secs_to_ticks(self.fire_cooldown_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Inclusive obstacle extent range, derived from the shorter world side
    pub fn obstacle_extent_range(&self) -> (f64, f64) {
        let side = self.world_width.min(self.world_height);
        let (big, small) = self.obstacle_extent_divisors;
        (side / big, side / small)
    }
}
