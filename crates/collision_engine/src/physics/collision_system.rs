//! Collision world: registry plus the configured broad-phase strategy
//!
//! This is the object a game constructs once and passes by reference to the
//! step driver and to whatever casts. Each simulation step runs, in order:
//!
//! 1. transform updates (outside this crate)
//! 2. [`CollisionWorld::refresh`]
//! 3. at most one [`CollisionWorld::run_broad_phase`]
//! 4. any number of casts
//!
//! Destruction requested by a pair handler is applied after the pass, since
//! the pass only borrows the world immutably.

use crate::config::CollisionConfig;
use crate::error::{CollisionError, Result};
use crate::physics::broad_phase::{owner_pair, BroadPhase, BruteForce};
use crate::physics::collision::{BoundingVolume, LineSegment};
use crate::physics::registry::{RefreshReport, VolumeId, VolumeRegistry};
use crate::physics::segment_cast::{self, CastView, Hit};
use crate::scene::{EntityId, TransformSource};
use std::collections::HashSet;

/// Registry, broad phase and cast queries behind one owner
pub struct CollisionWorld {
    registry: VolumeRegistry,
    broad_phase: Box<dyn BroadPhase>,
    config: CollisionConfig,
    steps: u64,
}

impl CollisionWorld {
    /// Create a world using the strategy named in `config`
    pub fn new(config: CollisionConfig) -> Self {
        let broad_phase = config.broad_phase.create();
        Self::with_broad_phase(config, broad_phase)
    }

    /// Create a world with a caller-supplied strategy
    pub fn with_broad_phase(config: CollisionConfig, broad_phase: Box<dyn BroadPhase>) -> Self {
        log::info!(
            "Collision world using {} broad phase{}",
            broad_phase.name(),
            if config.verify_broad_phase { " (verified against brute force)" } else { "" }
        );
        Self {
            registry: VolumeRegistry::new(),
            broad_phase,
            config,
            steps: 0,
        }
    }

    /// Register a volume, placed at its owner's current transform
    ///
    /// Casts made later in the same step see the volume where its owner is,
    /// without waiting for the next refresh. Fails with `OwnerNotFound` if
    /// the owner does not resolve, and with `InvalidBounds` if the placed box
    /// is not valid.
    pub fn add<S>(&mut self, entities: &S, mut volume: BoundingVolume) -> Result<VolumeId>
    where
        S: TransformSource + ?Sized,
    {
        let matrix = entities
            .world_transform(volume.owner())
            .ok_or(CollisionError::OwnerNotFound(volume.owner()))?;
        volume.update_world(&matrix)?;
        Ok(self.registry.add(volume))
    }

    /// Deregister a volume, `NotFound` if it is not registered
    pub fn remove(&mut self, id: VolumeId) -> Result<BoundingVolume> {
        self.registry.remove(id)
    }

    /// Deregister every volume of an entity
    pub fn remove_owned_by(&mut self, owner: EntityId) -> usize {
        self.registry.remove_owned_by(owner)
    }

    /// Per-step refresh of every world box and axis view
    pub fn refresh<S>(&mut self, entities: &S) -> Result<RefreshReport>
    where
        S: TransformSource + ?Sized,
    {
        let report = self.registry.refresh(entities)?;
        self.steps += 1;
        log::debug!(
            "Step {}: refreshed {} volumes, dropped {}",
            self.steps,
            report.refreshed,
            report.dropped.len()
        );
        Ok(report)
    }

    /// Report every overlapping owner pair to `on_pair`, returning the count
    ///
    /// With `verify_broad_phase` set, the brute-force reference runs as well
    /// and any disagreement is logged as a warning.
    pub fn run_broad_phase<F>(&self, mut on_pair: F) -> usize
    where
        F: FnMut(EntityId, EntityId),
    {
        if !self.config.verify_broad_phase {
            let mut count = 0;
            self.broad_phase.for_each_pair(&self.registry, &mut |a, b| {
                count += 1;
                on_pair(a, b);
            });
            return count;
        }

        let pairs = self.broad_phase.collect_pairs(&self.registry);
        let reference = BruteForce.collect_pairs(&self.registry);
        let found: HashSet<(EntityId, EntityId)> = pairs.iter().map(|&(a, b)| owner_pair(a, b)).collect();
        let expected: HashSet<(EntityId, EntityId)> =
            reference.iter().map(|&(a, b)| owner_pair(a, b)).collect();
        if found != expected {
            log::warn!(
                "{} broad phase disagrees with brute force: {} missing, {} extra",
                self.broad_phase.name(),
                expected.difference(&found).count(),
                found.difference(&expected).count()
            );
        }

        for &(a, b) in &pairs {
            on_pair(a, b);
        }
        pairs.len()
    }

    /// Nearest hit along `segment`
    pub fn cast(&self, segment: &LineSegment) -> Option<Hit> {
        segment_cast::cast(&self.registry, segment)
    }

    /// Nearest hit among owners accepted by `accept`
    pub fn cast_filtered<F>(&self, segment: &LineSegment, accept: F) -> Option<Hit>
    where
        F: FnMut(EntityId) -> bool,
    {
        segment_cast::cast_filtered(&self.registry, segment, accept)
    }

    /// Aim segment from an entity's position along its forward vector
    ///
    /// Length is the configured `aim_distance`. `None` if the entity is gone.
    pub fn aim_segment<S>(&self, entities: &S, shooter: EntityId) -> Option<LineSegment>
    where
        S: TransformSource + ?Sized,
    {
        let origin = entities.position(shooter)?;
        let forward = entities.forward(shooter)?;
        Some(LineSegment::from_ray(origin, forward, self.config.aim_distance))
    }

    /// Read-only cast access for rendering and UI
    pub fn cast_view(&self) -> CastView<'_> {
        self.registry.cast_view()
    }

    /// The underlying registry
    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Name of the active broad-phase strategy
    pub fn broad_phase_name(&self) -> &'static str {
        self.broad_phase.name()
    }

    /// Number of refreshes run so far
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
