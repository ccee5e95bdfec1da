//! Broad-phase pair enumeration
//!
//! Two interchangeable strategies walk a [`VolumeRegistry`] and report every
//! pair of overlapping volumes by owner:
//!
//! - [`BruteForce`] tests every unordered pair, `O(n²)`. It is the ground
//!   truth the optimized strategy is checked against.
//! - [`SweepAndPrune`] walks the registry's three axis-sorted views, keeps only
//!   pairs that overlap on every axis, and confirms each survivor with a full
//!   box test.
//!
//! Both strategies report each unordered pair of owners once, even when an
//! owner has several volumes overlapping the other. They never pair a volume
//! with itself, skip pairs whose volumes share an owner, and emit pairs in
//! ascending registration order of the first `(earlier, later)` volume pair
//! that produced them.

use crate::physics::collision::{overlaps, Axis};
use crate::physics::registry::{VolumeId, VolumeRegistry};
use crate::scene::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical unordered pair: earlier registration first
type PairKey = (VolumeId, VolumeId);

/// Owner pair in a fixed order, for deduplication and set comparison
pub(crate) fn owner_pair(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Interface for enumerating overlapping owner pairs
///
/// The registry is borrowed immutably for the whole pass, so handlers cannot
/// mutate it mid-scan; collect what needs destroying and apply it after.
pub trait BroadPhase: Send + Sync {
    /// Invoke `on_pair` once for every overlapping pair of owners
    fn for_each_pair(&self, registry: &VolumeRegistry, on_pair: &mut dyn FnMut(EntityId, EntityId));

    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Materialize the pass into a vector, in emission order
    fn collect_pairs(&self, registry: &VolumeRegistry) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        self.for_each_pair(registry, &mut |a, b| pairs.push((a, b)));
        pairs
    }
}

/// Strategy selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseKind {
    /// Every pair, `O(n²)`
    BruteForce,
    /// Sort-and-sweep over the axis views
    #[default]
    SweepAndPrune,
}

impl BroadPhaseKind {
    /// Instantiate the selected strategy
    pub fn create(self) -> Box<dyn BroadPhase> {
        match self {
            Self::BruteForce => Box::new(BruteForce),
            Self::SweepAndPrune => Box::new(SweepAndPrune),
        }
    }
}

/// Reference all-pairs strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn for_each_pair(&self, registry: &VolumeRegistry, on_pair: &mut dyn FnMut(EntityId, EntityId)) {
        let ids = registry.registered();
        let mut reported = HashSet::new();
        for (i, &a) in ids.iter().enumerate() {
            // Don't need to test against itself or anything earlier
            for &b in &ids[i + 1..] {
                let (owner_a, owner_b) = (registry.owner_of(a), registry.owner_of(b));
                if owner_a != owner_b
                    && overlaps(registry.world_box(a), registry.world_box(b))
                    && reported.insert(owner_pair(owner_a, owner_b))
                {
                    on_pair(owner_a, owner_b);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "brute_force"
    }
}

/// Sweep-and-prune over the registry's axis-sorted views
///
/// A pair is a real overlap only if it passes the single-axis test on all
/// three axes, so the per-axis candidate sets are intersected before the
/// final full-box confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepAndPrune;

impl SweepAndPrune {
    /// Pairs whose intervals overlap on `axis`
    ///
    /// For the anchor at position `i`, later entries are scanned only while
    /// their `min` is within the anchor's `max`. The view is sorted by `min`,
    /// so the first entry past it ends the scan for that anchor.
    fn axis_candidates(registry: &VolumeRegistry, axis: Axis) -> HashSet<PairKey> {
        let view = registry.sorted(axis);
        let mut candidates = HashSet::new();

        for (i, &a) in view.iter().enumerate() {
            let reach = registry.world_box(a).max_on(axis);
            let owner_a = registry.owner_of(a);
            for &b in &view[i + 1..] {
                if registry.world_box(b).min_on(axis) > reach {
                    break;
                }
                if registry.owner_of(b) == owner_a {
                    continue;
                }
                candidates.insert(canonical(registry, a, b));
            }
        }

        candidates
    }
}

impl BroadPhase for SweepAndPrune {
    fn for_each_pair(&self, registry: &VolumeRegistry, on_pair: &mut dyn FnMut(EntityId, EntityId)) {
        let mut survivors = Self::axis_candidates(registry, Axis::X);
        let x_candidates = survivors.len();

        for axis in [Axis::Y, Axis::Z] {
            if survivors.is_empty() {
                break;
            }
            let on_axis = Self::axis_candidates(registry, axis);
            survivors.retain(|pair| on_axis.contains(pair));
        }

        let mut confirmed: Vec<PairKey> = survivors
            .into_iter()
            .filter(|&(a, b)| overlaps(registry.world_box(a), registry.world_box(b)))
            .collect();
        confirmed.sort_unstable_by_key(|&(a, b)| (registry.order_of(a), registry.order_of(b)));

        log::trace!(
            "Sweep-and-prune: {} volumes, {} x-axis candidates, {} overlapping",
            registry.len(),
            x_candidates,
            confirmed.len()
        );

        let mut reported = HashSet::new();
        for (a, b) in confirmed {
            let (owner_a, owner_b) = (registry.owner_of(a), registry.owner_of(b));
            if reported.insert(owner_pair(owner_a, owner_b)) {
                log::trace!("Overlap: {owner_a:?} / {owner_b:?}");
                on_pair(owner_a, owner_b);
            }
        }
    }

    fn name(&self) -> &'static str {
        "sweep_and_prune"
    }
}

fn canonical(registry: &VolumeRegistry, a: VolumeId, b: VolumeId) -> PairKey {
    if registry.order_of(a) < registry.order_of(b) {
        (a, b)
    } else {
        (b, a)
    }
}
