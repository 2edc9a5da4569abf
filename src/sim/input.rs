//! Input intent mapping: raw key press/release events to craft intents

use serde::{Deserialize, Serialize};

use super::craft::Direction;
use super::surface::RenderSurface;
use super::world::World;

/// Keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Thrust(Direction),
    Fire,
}

impl Key {
    /// Parse a key name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "up" | "w" => Some(Key::Thrust(Direction::Up)),
            "down" | "s" => Some(Key::Thrust(Direction::Down)),
            "left" | "a" => Some(Key::Thrust(Direction::Left)),
            "right" | "d" => Some(Key::Thrust(Direction::Right)),
            "fire" | "space" => Some(Key::Fire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Press,
    Release,
}

/// A discrete key event from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub key: Key,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            action: KeyAction::Press,
            key,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            action: KeyAction::Release,
            key,
        }
    }

    /// Parse one line of text input.
    ///
    /// Accepts `press <key>`, `release <key>`, `+<key>`, `-<key>`, or a bare
    /// key name (a press).
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let first = words.next()?;

        let event = match (first.to_lowercase().as_str(), words.next()) {
            ("press", Some(key)) => Self::press(Key::parse(key)?),
            ("release", Some(key)) => Self::release(Key::parse(key)?),
            (_, None) => {
                if let Some(key) = first.strip_prefix('+') {
                    Self::press(Key::parse(key)?)
                } else if let Some(key) = first.strip_prefix('-') {
                    Self::release(Key::parse(key)?)
                } else {
                    Self::press(Key::parse(first)?)
                }
            }
            _ => return None,
        };

        if words.next().is_some() {
            return None;
        }
        Some(event)
    }
}

/// Translate one key event into craft intents
pub fn apply_key_event<S: RenderSurface>(world: &mut World<S>, event: KeyEvent) {
    match (event.action, event.key) {
        (KeyAction::Press, Key::Thrust(dir)) => world.press_thrust(dir),
        (KeyAction::Release, Key::Thrust(dir)) => world.release_thrust(dir),
        (KeyAction::Press, Key::Fire) => {
            if world.fire().is_none() {
                log::trace!("fire ignored (at rest or cooling down)");
            }
        }
        (KeyAction::Release, Key::Fire) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::EntityKind;
    use crate::sim::surface::HeadlessSurface;
    use glam::DVec2;

    fn world() -> World<HeadlessSurface> {
        World::new(
            Settings {
                initial_obstacles: 0,
                ..Default::default()
            },
            HeadlessSurface::new(),
        )
    }

    #[test]
    fn test_parse_forms() {
        let up = Key::Thrust(Direction::Up);
        assert_eq!(KeyEvent::parse("press up"), Some(KeyEvent::press(up)));
        assert_eq!(KeyEvent::parse("  RELEASE Up "), Some(KeyEvent::release(up)));
        assert_eq!(KeyEvent::parse("+up"), Some(KeyEvent::press(up)));
        assert_eq!(KeyEvent::parse("-w"), Some(KeyEvent::release(up)));
        assert_eq!(KeyEvent::parse("space"), Some(KeyEvent::press(Key::Fire)));
        assert_eq!(KeyEvent::parse("fire"), Some(KeyEvent::press(Key::Fire)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(KeyEvent::parse(""), None);
        assert_eq!(KeyEvent::parse("jump"), None);
        assert_eq!(KeyEvent::parse("press"), None);
        assert_eq!(KeyEvent::parse("press up now"), None);
        assert_eq!(KeyEvent::parse("hold up"), None);
    }

    #[test]
    fn test_diagonal_then_release_one() {
        let mut world = world();
        apply_key_event(&mut world, KeyEvent::press(Key::Thrust(Direction::Up)));
        apply_key_event(&mut world, KeyEvent::press(Key::Thrust(Direction::Right)));
        assert_eq!(world.craft().unwrap().body.accel, DVec2::new(1.0, -1.0));

        apply_key_event(&mut world, KeyEvent::release(Key::Thrust(Direction::Up)));
        assert_eq!(world.craft().unwrap().body.accel, DVec2::new(1.0, 0.0));

        apply_key_event(&mut world, KeyEvent::release(Key::Thrust(Direction::Right)));
        assert_eq!(world.craft().unwrap().body.accel, DVec2::ZERO);
    }

    #[test]
    fn test_fire_key_spawns_projectile_once_moving() {
        let mut world = world();
        apply_key_event(&mut world, KeyEvent::press(Key::Fire));
        assert_eq!(world.count(EntityKind::Projectile), 0);

        apply_key_event(&mut world, KeyEvent::press(Key::Thrust(Direction::Down)));
        for _ in 0..3 {
            world.tick();
        }
        apply_key_event(&mut world, KeyEvent::press(Key::Fire));
        apply_key_event(&mut world, KeyEvent::release(Key::Fire));
        assert_eq!(world.count(EntityKind::Projectile), 1);
    }
}
