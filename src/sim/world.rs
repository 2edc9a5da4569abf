//! World: live entity arena, fixed tick, overlap resolution and respawns

use std::collections::{BTreeMap, HashMap};

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::craft::{CraftState, Direction};
use super::entity::{
    Entity, EntityId, EntityKind, Role, craft_body, obstacle_body, projectile_body,
};
use super::surface::{RenderSurface, SurfaceHandle};
use crate::settings::Settings;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A projectile outlived its life-span
    ProjectileExpired { projectile: EntityId },
    /// An obstacle was hit by a projectile
    ObstacleDestroyed { obstacle: EntityId, by: EntityId },
    /// A projectile was used up destroying an obstacle
    ProjectileConsumed { projectile: EntityId },
    /// A replacement obstacle entered the world
    ObstacleSpawned { obstacle: EntityId },
}

/// Serializable view of one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: DVec2,
    pub vel: DVec2,
    pub extent: f64,
}

/// Serializable view of the whole world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub time: f64,
    pub entities: Vec<EntitySnapshot>,
}

/// The simulation: one craft, its projectiles and the drifting obstacles.
///
/// Every live entity owns exactly one surface handle; `handles` and
/// `owners` are kept in step with `entities` by [`World::add_entity`] and
/// [`World::remove_entity`].
pub struct World<S: RenderSurface> {
    settings: Settings,
    surface: S,
    /// Live entities (sorted by id for stable iteration)
    entities: Vec<Entity>,
    handles: BTreeMap<EntityId, SurfaceHandle>,
    owners: HashMap<SurfaceHandle, EntityId>,
    craft_id: EntityId,
    rng: Pcg32,
    time_ticks: u64,
    next_id: u32,
}

impl<S: RenderSurface> World<S> {
    /// Create a world with the craft at the center and the initial obstacles
    pub fn new(settings: Settings, surface: S) -> Self {
        let settings = settings.sanitized();
        let mut world = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            surface,
            entities: Vec::new(),
            handles: BTreeMap::new(),
            owners: HashMap::new(),
            craft_id: EntityId(0),
            time_ticks: 0,
            next_id: 1,
            settings,
        };

        let body = craft_body(&world.settings);
        world.craft_id = world.add_entity(body, Role::Craft(CraftState::new(0)));

        for _ in 0..world.settings.initial_obstacles {
            world.spawn_obstacle();
        }

        log::info!(
            "World {}x{} created with {} obstacle(s)",
            world.settings.world_width,
            world.settings.world_height,
            world.settings.initial_obstacles
        );
        world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Toroidal arena size
    pub fn arena(&self) -> DVec2 {
        DVec2::new(self.settings.world_width, self.settings.world_height)
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Simulation clock in seconds, for reporting only; timing rules
    /// compare whole ticks
    pub fn now(&self) -> f64 {
        self.time_ticks as f64 * self.settings.tick_seconds()
    }

    pub fn craft_id(&self) -> EntityId {
        self.craft_id
    }

    pub fn craft(&self) -> Option<&Entity> {
        self.get(self.craft_id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn handle_of(&self, id: EntityId) -> Option<SurfaceHandle> {
        self.handles.get(&id).copied()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    fn craft_parts(&mut self) -> Option<(&mut Body, &mut CraftState)> {
        let Entity { body, role, .. } = self.entity_mut(self.craft_id)?;
        match role {
            Role::Craft(state) => Some((body, state)),
            _ => None,
        }
    }

    /// Register an entity and create its surface handle
    pub fn add_entity(&mut self, body: Body, role: Role) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let entity = Entity { id, body, role };
        let handle = self.surface.create_handle(entity.shape(), entity.body.bounds());
        self.handles.insert(id, handle);
        self.owners.insert(handle, id);
        log::debug!("add {entity}");
        // Ids only grow, so pushing keeps the arena sorted
        self.entities.push(entity);
        id
    }

    /// Unregister an entity and destroy its surface handle
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.entities.remove(index);
        if let Some(handle) = self.handles.remove(&id) {
            self.owners.remove(&handle);
            self.surface.destroy_handle(handle);
        }
        log::debug!("remove {entity}");
        Some(entity)
    }

    /// Add one randomized obstacle
    pub fn spawn_obstacle(&mut self) -> EntityId {
        let body = obstacle_body(&self.settings, &mut self.rng);
        self.add_entity(body, Role::Obstacle)
    }

    /// Overwrite one thrust axis (or clear both with `None`)
    pub fn set_thrust(&mut self, thrust: Option<Direction>) {
        let force = self.settings.thrust_force;
        if let Some((body, craft)) = self.craft_parts() {
            craft.set_thrust(body, thrust, force);
        }
    }

    pub fn press_thrust(&mut self, dir: Direction) {
        let force = self.settings.thrust_force;
        if let Some((body, craft)) = self.craft_parts() {
            craft.press(body, dir, force);
        }
    }

    pub fn release_thrust(&mut self, dir: Direction) {
        let force = self.settings.thrust_force;
        if let Some((body, craft)) = self.craft_parts() {
            craft.release(body, dir, force);
        }
    }

    /// Fire a projectile along the craft's velocity.
    ///
    /// A no-op returning `None` while the craft is at rest or cooling down.
    pub fn fire(&mut self) -> Option<EntityId> {
        let now = self.time_ticks;
        let cooldown = self.settings.fire_cooldown_ticks();
        let (origin, dir) = {
            let (body, craft) = self.craft_parts()?;
            let dir = craft.fire_direction(body, now, cooldown)?;
            craft.last_fire_tick = now;
            (body.center(), dir)
        };

        let body = projectile_body(&self.settings, origin, dir);
        let id = self.add_entity(body, Role::Projectile { born_tick: now });
        log::debug!("fire {id} toward ({:.3}, {:.3})", dir.x, dir.y);
        Some(id)
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> Vec<SimEvent> {
        self.time_ticks += 1;
        let now = self.time_ticks;
        let arena = self.arena();
        let life_ticks = self.settings.projectile_life_ticks();
        let mut events = Vec::new();

        // Entities spawned during this tick wait for the next one
        let ids: Vec<EntityId> = self.entities.iter().map(|e| e.id).collect();
        for id in ids {
            let (bounds, expired) = match self.entity_mut(id) {
                Some(entity) => {
                    entity.body.integrate(arena);
                    log::trace!("{entity}");
                    (entity.body.bounds(), entity.expired(now, life_ticks))
                }
                // Removed earlier in this tick
                None => continue,
            };

            if expired {
                self.remove_entity(id);
                events.push(SimEvent::ProjectileExpired { projectile: id });
                continue;
            }

            let Some(handle) = self.handle_of(id) else {
                continue;
            };
            self.surface.move_handle(handle, bounds);

            let hits = self.surface.query_overlapping(bounds);
            if hits.len() > 1 {
                self.resolve_overlap(&hits, &mut events);
            }
        }

        events
    }

    /// Projectile + obstacle in one overlap set destroys every obstacle in
    /// it, each replaced 1:1. Overlaps involving the craft have no effect.
    fn resolve_overlap(&mut self, hits: &[SurfaceHandle], events: &mut Vec<SimEvent>) {
        let mut projectiles = Vec::new();
        let mut obstacles = Vec::new();
        for id in hits.iter().filter_map(|h| self.owners.get(h)) {
            match self.get(*id).map(Entity::kind) {
                Some(EntityKind::Projectile) => projectiles.push(*id),
                Some(EntityKind::Obstacle) => obstacles.push(*id),
                _ => {}
            }
        }

        let Some(&by) = projectiles.first() else {
            return;
        };
        if obstacles.is_empty() {
            return;
        }

        for obstacle in obstacles {
            self.remove_entity(obstacle);
            events.push(SimEvent::ObstacleDestroyed { obstacle, by });
            let replacement = self.spawn_obstacle();
            events.push(SimEvent::ObstacleSpawned {
                obstacle: replacement,
            });
            log::debug!("obstacle {obstacle} destroyed by {by}, replaced by {replacement}");
        }

        if self.settings.projectile_consumed_on_hit {
            for projectile in projectiles {
                self.remove_entity(projectile);
                events.push(SimEvent::ProjectileConsumed { projectile });
            }
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.time_ticks,
            time: self.now(),
            entities: self
                .entities
                .iter()
                .map(|e| EntitySnapshot {
                    id: e.id,
                    kind: e.kind(),
                    pos: e.body.pos,
                    vel: e.body.vel,
                    extent: e.body.extent,
                })
                .collect(),
        }
    }

    /// Remove every entity (destroying its handle) and hand back the surface
    pub fn teardown(mut self) -> S {
        let ids: Vec<EntityId> = self.entities.iter().map(|e| e.id).collect();
        for id in ids {
            self.remove_entity(id);
        }
        log::info!("World torn down after {} ticks", self.time_ticks);
        self.surface
    }
}
