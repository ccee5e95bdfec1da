//! Volume registry
//!
//! Owns every live [`BoundingVolume`] and keeps three views of the same
//! member set sorted by `min.x`, `min.y` and `min.z`. Ties on an axis are
//! broken by registration order, so every view is a total order and passes
//! over it are reproducible run to run.
//!
//! Entities move every step, so the views are only valid after
//! [`VolumeRegistry::refresh`] has run for the current step.

use crate::error::{CollisionError, Result};
use crate::physics::collision::{Aabb, Axis, BoundingVolume};
use crate::scene::{EntityId, TransformSource};
use slotmap::SlotMap;
use std::cmp::Ordering;

slotmap::new_key_type! {
    /// Generational handle to a registered volume
    pub struct VolumeId;
}

#[derive(Debug, Clone)]
struct Entry {
    volume: BoundingVolume,
    /// Monotonic registration stamp, the tie-break on every axis
    order: u64,
}

/// Outcome of one [`VolumeRegistry::refresh`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Volumes whose world box was recomputed
    pub refreshed: usize,
    /// Volumes removed because their owner no longer resolves
    pub dropped: Vec<VolumeId>,
}

/// Registry of live volumes plus their axis-sorted views
#[derive(Debug, Default)]
pub struct VolumeRegistry {
    volumes: SlotMap<VolumeId, Entry>,
    /// Live ids in registration order
    registered: Vec<VolumeId>,
    /// Live ids sorted by `(min[axis], order)`, indexed by `Axis::index`
    sorted: [Vec<VolumeId>; 3],
    next_order: u64,
}

impl VolumeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a volume, returning the handle used to remove it later
    pub fn add(&mut self, volume: BoundingVolume) -> VolumeId {
        let order = self.next_order;
        self.next_order += 1;

        let owner = volume.owner();
        let id = self.volumes.insert(Entry { volume, order });
        self.registered.push(id);

        let volumes = &self.volumes;
        for axis in Axis::all() {
            let view = &mut self.sorted[axis.index()];
            let at = view.partition_point(|&other| {
                compare_on_axis(volumes, other, id, axis) == Ordering::Less
            });
            view.insert(at, id);
        }

        log::debug!("Registered volume {id:?} for {owner:?} ({} live)", self.len());
        id
    }

    /// Deregister a volume
    ///
    /// Removing a handle that is not registered (never added, or already
    /// removed) fails with [`CollisionError::NotFound`].
    pub fn remove(&mut self, id: VolumeId) -> Result<BoundingVolume> {
        let volume = self.detach(id).ok_or(CollisionError::NotFound(id))?;
        log::debug!("Removed volume {id:?} ({} live)", self.len());
        Ok(volume)
    }

    /// Deregister every volume owned by `owner`, returning how many went
    pub fn remove_owned_by(&mut self, owner: EntityId) -> usize {
        let doomed: Vec<VolumeId> = self
            .registered
            .iter()
            .copied()
            .filter(|&id| self.volumes[id].volume.owner() == owner)
            .collect();
        for &id in &doomed {
            self.detach(id);
        }
        if !doomed.is_empty() {
            log::debug!("Removed {} volumes of {owner:?} ({} live)", doomed.len(), self.len());
        }
        doomed.len()
    }

    /// Rebuild every world box from its owner's transform and re-sort
    ///
    /// Must run once per simulation step, after transforms move and before any
    /// broad-phase pass or cast. Volumes whose owner no longer resolves are
    /// dropped. All boxes are validated before anything is written, so an
    /// `InvalidBounds` error leaves the registry exactly as it was.
    pub fn refresh<S>(&mut self, entities: &S) -> Result<RefreshReport>
    where
        S: TransformSource + ?Sized,
    {
        let mut updates = Vec::with_capacity(self.registered.len());
        let mut dropped = Vec::new();

        for &id in &self.registered {
            let volume = &self.volumes[id].volume;
            match entities.world_transform(volume.owner()) {
                Some(matrix) => updates.push((id, volume.compute_world(&matrix)?)),
                None => dropped.push(id),
            }
        }

        for &id in &dropped {
            log::debug!("Dropping volume {id:?}: owner no longer exists");
            self.detach(id);
        }

        for &(id, world) in &updates {
            self.volumes[id].volume.set_world(world);
        }

        self.resort();

        Ok(RefreshReport {
            refreshed: updates.len(),
            dropped,
        })
    }

    /// Remove every volume
    pub fn clear(&mut self) {
        self.volumes.clear();
        self.registered.clear();
        for view in &mut self.sorted {
            view.clear();
        }
    }

    /// Number of live volumes
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Whether no volumes are registered
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Whether the handle is registered
    pub fn contains(&self, id: VolumeId) -> bool {
        self.volumes.contains_key(id)
    }

    /// Registered volume by handle
    pub fn get(&self, id: VolumeId) -> Option<&BoundingVolume> {
        self.volumes.get(id).map(|entry| &entry.volume)
    }

    /// Registration stamp of a volume; earlier registrations compare lower
    pub fn registration_index(&self, id: VolumeId) -> Option<u64> {
        self.volumes.get(id).map(|entry| entry.order)
    }

    /// Live volumes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (VolumeId, &BoundingVolume)> + '_ {
        self.registered
            .iter()
            .map(move |&id| (id, &self.volumes[id].volume))
    }

    /// Live ids in registration order
    pub fn registered(&self) -> &[VolumeId] {
        &self.registered
    }

    /// Live ids sorted ascending by `min` on `axis`, ties by registration
    pub fn sorted(&self, axis: Axis) -> &[VolumeId] {
        &self.sorted[axis.index()]
    }

    /// Checks that all four containers agree and every view is in order
    pub fn is_consistent(&self) -> bool {
        let count = self.volumes.len();
        if self.registered.len() != count
            || self.sorted.iter().any(|view| view.len() != count)
            || !self.registered.iter().all(|&id| self.volumes.contains_key(id))
        {
            return false;
        }

        let registration_ordered = self
            .registered
            .windows(2)
            .all(|w| self.volumes[w[0]].order < self.volumes[w[1]].order);

        registration_ordered
            && Axis::all().iter().all(|&axis| {
                let view = &self.sorted[axis.index()];
                view.iter().all(|&id| self.volumes.contains_key(id))
                    && view.windows(2).all(|w| {
                        compare_on_axis(&self.volumes, w[0], w[1], axis) == Ordering::Less
                    })
            })
    }

    pub(crate) fn world_box(&self, id: VolumeId) -> &Aabb {
        self.volumes[id].volume.world()
    }

    pub(crate) fn owner_of(&self, id: VolumeId) -> EntityId {
        self.volumes[id].volume.owner()
    }

    pub(crate) fn order_of(&self, id: VolumeId) -> u64 {
        self.volumes[id].order
    }

    /// Take a volume out of all four containers; `None` if it is not live
    fn detach(&mut self, id: VolumeId) -> Option<BoundingVolume> {
        let entry = self.volumes.remove(id)?;
        self.registered.retain(|&other| other != id);
        for view in &mut self.sorted {
            view.retain(|&other| other != id);
        }
        Some(entry.volume)
    }

    fn resort(&mut self) {
        let volumes = &self.volumes;
        for axis in Axis::all() {
            // Mostly sorted from the previous step; the stable sort is near linear on it
            self.sorted[axis.index()].sort_by(|&a, &b| compare_on_axis(volumes, a, b, axis));
        }
    }
}

fn compare_on_axis(
    volumes: &SlotMap<VolumeId, Entry>,
    a: VolumeId,
    b: VolumeId,
    axis: Axis,
) -> Ordering {
    let (ea, eb) = (&volumes[a], &volumes[b]);
    ea.volume
        .world()
        .min_on(axis)
        .total_cmp(&eb.volume.world().min_on(axis))
        .then(ea.order.cmp(&eb.order))
}
