//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only (velocities are per tick)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Drawing is delegated to a [`RenderSurface`]

pub mod body;
pub mod craft;
pub mod entity;
pub mod input;
pub mod surface;
pub mod world;

pub use body::{Aabb, Body};
pub use craft::{CraftState, Direction, HeldKeys};
pub use entity::{Entity, EntityId, EntityKind, Role};
pub use input::{Key, KeyAction, KeyEvent, apply_key_event};
pub use surface::{HeadlessSurface, RenderSurface, Shape, SurfaceHandle, Tint};
pub use world::{EntitySnapshot, SimEvent, World, WorldSnapshot};
