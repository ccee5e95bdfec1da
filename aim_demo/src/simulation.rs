//! Headless shooter scene driving the collision world
//!
//! A ship sits at the origin and slowly turns. Targets drift through a cube
//! arena and wrap at its faces. Whenever the crosshair cast lands on a target
//! the ship fires a projectile; projectile/target overlaps destroy both, and
//! targets that drift into the ship are destroyed on contact.

use crate::config::DemoConfig;
use crate::error::Result;
use collision_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::SecondaryMap;

/// Spawn distance of projectiles ahead of the ship's center
const MUZZLE_OFFSET: f32 = 2.0;
const PROJECTILE_HALF_EXTENT: f32 = 0.25;
const TARGET_SCALE: f32 = 1.5;
/// Targets stay within this band around the ship's firing plane
const TARGET_HEIGHT: f32 = 2.0;
const REPORT_INTERVAL: u32 = 120;

/// What an entity is in this scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The player ship
    Ship,
    /// A drifting target
    Target,
    /// A fired projectile
    Projectile,
}

#[derive(Debug, Clone, Copy)]
struct Body {
    kind: Kind,
    velocity: Vec3,
    volume: VolumeId,
    /// Seconds left for projectiles, unused otherwise
    remaining: f32,
}

/// Running totals for the final report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Steps simulated
    pub steps: u32,
    /// Overlapping pairs reported by the broad phase
    pub pairs: usize,
    /// Projectiles fired
    pub shots: u32,
    /// Targets destroyed by projectiles
    pub kills: u32,
    /// Targets destroyed by flying into the ship
    pub rams: u32,
    /// Projectiles that timed out
    pub expired: u32,
    /// Steps with a target under the crosshair
    pub locked_steps: u32,
}

/// Scene state plus the collision world
pub struct Simulation {
    config: DemoConfig,
    entities: EntityTable,
    world: CollisionWorld,
    bodies: SecondaryMap<EntityId, Body>,
    ship: EntityId,
    yaw: f32,
    cooldown: f32,
    rng: StdRng,
    stats: Stats,
}

impl Simulation {
    /// Build the ship and the initial targets
    pub fn new(config: DemoConfig) -> Result<Self> {
        config.validate()?;

        let mut entities = EntityTable::new();
        let mut world = CollisionWorld::new(config.collision.clone());
        let mut bodies = SecondaryMap::new();

        let ship = entities.spawn(Transform::identity());
        let hull = Aabb::from_center_half_extents(Vec3::zeros(), Vec3::new(1.0, 0.5, 1.0))?;
        let volume = world.add(&entities, BoundingVolume::new(ship, hull).with_rotation(true))?;
        bodies.insert(
            ship,
            Body {
                kind: Kind::Ship,
                velocity: Vec3::zeros(),
                volume,
                remaining: 0.0,
            },
        );

        let mut simulation = Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            entities,
            world,
            bodies,
            ship,
            yaw: 0.0,
            cooldown: 0.0,
            stats: Stats::default(),
        };
        for _ in 0..simulation.config.target_count {
            simulation.spawn_random_target()?;
        }
        log::info!(
            "Scene ready: {} targets in a {}-unit arena",
            simulation.config.target_count,
            simulation.config.arena_extent * 2.0
        );
        Ok(simulation)
    }

    /// Run every configured step and return the totals
    pub fn run(&mut self) -> Result<Stats> {
        for _ in 0..self.config.steps {
            self.step()?;
            if self.stats.steps % REPORT_INTERVAL == 0 {
                log::info!(
                    "Step {}: {} volumes, {} shots, {} kills",
                    self.stats.steps,
                    self.world.registry().len(),
                    self.stats.shots,
                    self.stats.kills
                );
            }
        }
        Ok(self.stats.clone())
    }

    /// One simulation step: move, refresh, resolve overlaps, aim
    pub fn step(&mut self) -> Result<()> {
        let dt = self.config.delta_time;

        self.advance(dt)?;
        self.world.refresh(&self.entities)?;
        self.resolve_overlaps()?;
        self.aim_and_fire(dt)?;

        self.stats.steps += 1;
        Ok(())
    }

    /// Totals so far
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The collision world
    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Live entities of one kind
    pub fn count(&self, kind: Kind) -> usize {
        self.bodies.values().filter(|body| body.kind == kind).count()
    }

    /// Place a target explicitly
    pub fn spawn_target(&mut self, position: Vec3, velocity: Vec3) -> Result<EntityId> {
        let entity = self
            .entities
            .spawn(Transform::from_position(position).with_uniform_scale(TARGET_SCALE));
        let unit = Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(1.0))?;
        let volume = self.world.add(&self.entities, BoundingVolume::new(entity, unit))?;
        self.bodies.insert(
            entity,
            Body {
                kind: Kind::Target,
                velocity,
                volume,
                remaining: 0.0,
            },
        );
        Ok(entity)
    }

    fn spawn_random_target(&mut self) -> Result<EntityId> {
        let extent = self.config.arena_extent;
        let position = Vec3::new(
            self.rng.gen_range(-extent..=extent),
            self.rng.gen_range(-TARGET_HEIGHT..=TARGET_HEIGHT),
            self.rng.gen_range(-extent..=extent),
        );
        let heading = Vec3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-0.1..=0.1),
            self.rng.gen_range(-1.0..=1.0),
        )
        .try_normalize(1.0e-6)
        .unwrap_or_else(Vec3::x);
        let speed = self
            .rng
            .gen_range(self.config.target_speed_min..=self.config.target_speed_max);

        self.spawn_target(position, heading * speed)
    }

    fn fire(&mut self) -> Result<()> {
        let Some(transform) = self.entities.get(self.ship) else {
            return Ok(());
        };
        let forward = transform.forward();
        let muzzle = transform.position + forward * MUZZLE_OFFSET;

        let entity = self.entities.spawn(Transform::from_position(muzzle));
        let round = Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(PROJECTILE_HALF_EXTENT))?;
        let volume = self.world.add(&self.entities, BoundingVolume::new(entity, round))?;
        self.bodies.insert(
            entity,
            Body {
                kind: Kind::Projectile,
                velocity: forward * self.config.projectile_speed,
                volume,
                remaining: self.config.projectile_lifetime,
            },
        );
        self.stats.shots += 1;
        Ok(())
    }

    /// Remove an entity and its volume, returning what it was
    fn destroy(&mut self, entity: EntityId) -> Result<Option<Kind>> {
        let Some(body) = self.bodies.remove(entity) else {
            return Ok(None);
        };
        self.world.remove(body.volume)?;
        self.entities.despawn(entity);
        Ok(Some(body.kind))
    }

    fn advance(&mut self, dt: f32) -> Result<()> {
        self.yaw = (self.yaw + self.config.turn_rate * dt) % std::f32::consts::TAU;
        if let Some(ship) = self.entities.get_mut(self.ship) {
            ship.rotation = Quat::from_axis_angle(&Vec3::y_axis(), self.yaw);
        }

        let extent = self.config.arena_extent;
        let mut expired = Vec::new();
        for (entity, body) in &mut self.bodies {
            let Some(transform) = self.entities.get_mut(entity) else {
                continue;
            };
            transform.position += body.velocity * dt;

            match body.kind {
                Kind::Projectile => {
                    body.remaining -= dt;
                    if body.remaining <= 0.0 {
                        expired.push(entity);
                    }
                }
                Kind::Target => {
                    // Wrap to the opposite face
                    for axis in [0, 2] {
                        let value = transform.position[axis];
                        if value.abs() > extent {
                            transform.position[axis] = -value.signum() * extent;
                        }
                    }
                }
                Kind::Ship => {}
            }
        }

        for entity in expired {
            self.destroy(entity)?;
            self.stats.expired += 1;
        }
        Ok(())
    }

    fn resolve_overlaps(&mut self) -> Result<()> {
        let bodies = &self.bodies;
        let kind_of = |entity: EntityId| bodies.get(entity).map(|body| body.kind);

        // The pass borrows the world; destruction waits until it is over
        let mut shot = Vec::new();
        let mut rammed = Vec::new();
        self.stats.pairs += self.world.run_broad_phase(|a, b| match (kind_of(a), kind_of(b)) {
            (Some(Kind::Projectile), Some(Kind::Target))
            | (Some(Kind::Target), Some(Kind::Projectile)) => shot.extend([a, b]),
            (Some(Kind::Ship), Some(Kind::Target)) => rammed.push(b),
            (Some(Kind::Target), Some(Kind::Ship)) => rammed.push(a),
            _ => {}
        });

        let mut targets_lost = 0;
        for entity in shot {
            // Already gone if it overlapped more than one projectile
            if self.destroy(entity)? == Some(Kind::Target) {
                self.stats.kills += 1;
                targets_lost += 1;
            }
        }
        for entity in rammed {
            if self.destroy(entity)? == Some(Kind::Target) {
                self.stats.rams += 1;
                targets_lost += 1;
            }
        }
        if targets_lost > 0 {
            log::debug!("Destroyed {targets_lost} targets this step");
        }

        while self.count(Kind::Target) < self.config.target_count {
            self.spawn_random_target()?;
        }
        Ok(())
    }

    fn aim_and_fire(&mut self, dt: f32) -> Result<()> {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let Some(aim) = self.world.aim_segment(&self.entities, self.ship) else {
            return Ok(());
        };
        let ship = self.ship;
        let hit = self.world.cast_view().cast_filtered(&aim, |owner| owner != ship);
        let locked = hit.filter(|hit| {
            self.bodies
                .get(hit.owner)
                .is_some_and(|body| body.kind == Kind::Target)
        });

        if let Some(hit) = locked {
            self.stats.locked_steps += 1;
            log::debug!(
                "Target {:?} under crosshair, {:.1} units out",
                hit.owner,
                hit.t * self.world.config().aim_distance
            );
            if self.cooldown <= 0.0 {
                self.fire()?;
                self.cooldown = self.config.fire_interval;
            }
        }
        Ok(())
    }
}
