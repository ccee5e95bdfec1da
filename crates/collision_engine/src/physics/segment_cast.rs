//! Segment casts against registered volumes
//!
//! A linear scan over the registry in registration order, running the slab
//! test against every world box and keeping the smallest `t`. Equal `t`
//! keeps the earlier-registered volume.

use crate::foundation::math::Vec3;
use crate::physics::collision::{cast_segment, LineSegment};
use crate::physics::registry::{VolumeId, VolumeRegistry};
use crate::scene::EntityId;

/// Closest intersection reported by a cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection in world space
    pub point: Vec3,
    /// Outward normal of the entry face; zero if the segment started inside
    pub normal: Vec3,
    /// Volume that was hit
    pub volume: VolumeId,
    /// Entity owning the hit volume
    pub owner: EntityId,
    /// Parametric distance along the segment, in `[0, 1]`
    pub t: f32,
}

/// Nearest hit along `segment`, or `None` if nothing is hit
pub fn cast(registry: &VolumeRegistry, segment: &LineSegment) -> Option<Hit> {
    cast_filtered(registry, segment, |_| true)
}

/// Nearest hit among volumes whose owner passes `accept`
///
/// Typical use is excluding the caster itself from its own aim ray.
pub fn cast_filtered<F>(registry: &VolumeRegistry, segment: &LineSegment, mut accept: F) -> Option<Hit>
where
    F: FnMut(EntityId) -> bool,
{
    let mut closest: Option<Hit> = None;

    for (volume, bounds) in registry.iter() {
        if !accept(bounds.owner()) {
            continue;
        }
        let Some(intersection) = cast_segment(segment, bounds.world()) else {
            continue;
        };
        // Strict comparison: on a tie the earlier registration stays
        if closest.map_or(true, |best| intersection.t < best.t) {
            closest = Some(Hit {
                point: segment.point_at(intersection.t),
                normal: intersection.normal,
                volume,
                owner: bounds.owner(),
                t: intersection.t,
            });
        }
    }

    closest
}

/// Every hit along `segment`, nearest first, ties in registration order
pub fn cast_all(registry: &VolumeRegistry, segment: &LineSegment) -> Vec<Hit> {
    let mut hits: Vec<Hit> = registry
        .iter()
        .filter_map(|(volume, bounds)| {
            cast_segment(segment, bounds.world()).map(|intersection| Hit {
                point: segment.point_at(intersection.t),
                normal: intersection.normal,
                volume,
                owner: bounds.owner(),
                t: intersection.t,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.t.total_cmp(&b.t));
    hits
}

/// Read-only cast access to a registry
///
/// Handed to rendering and UI code (crosshair, targeting) that may query
/// the world but must not register or remove volumes.
#[derive(Debug, Clone, Copy)]
pub struct CastView<'a> {
    registry: &'a VolumeRegistry,
}

impl<'a> CastView<'a> {
    /// Wrap a registry
    pub fn new(registry: &'a VolumeRegistry) -> Self {
        Self { registry }
    }

    /// See [`cast`]
    pub fn cast(&self, segment: &LineSegment) -> Option<Hit> {
        cast(self.registry, segment)
    }

    /// See [`cast_filtered`]
    pub fn cast_filtered<F>(&self, segment: &LineSegment, accept: F) -> Option<Hit>
    where
        F: FnMut(EntityId) -> bool,
    {
        cast_filtered(self.registry, segment, accept)
    }

    /// See [`cast_all`]
    pub fn cast_all(&self, segment: &LineSegment) -> Vec<Hit> {
        cast_all(self.registry, segment)
    }
}

impl VolumeRegistry {
    /// Read-only view exposing only cast queries
    pub fn cast_view(&self) -> CastView<'_> {
        CastView::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::physics::collision::{Aabb, BoundingVolume};
    use crate::scene::EntityTable;
    use approx::assert_relative_eq;

    struct Scene {
        entities: EntityTable,
        registry: VolumeRegistry,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                entities: EntityTable::new(),
                registry: VolumeRegistry::new(),
            }
        }

        fn place(&mut self, min: [f32; 3], max: [f32; 3]) -> (EntityId, VolumeId) {
            let owner = self.entities.spawn(Transform::identity());
            let aabb = Aabb::new(Vec3::from(min), Vec3::from(max)).unwrap();
            (owner, self.registry.add(BoundingVolume::new(owner, aabb)))
        }
    }

    fn along_x() -> LineSegment {
        LineSegment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_single_box_hit_at_quarter() {
        let mut scene = Scene::new();
        let (owner, volume) = scene.place([2.5, -1.0, -1.0], [3.5, 1.0, 1.0]);
        scene.place([2.5, 5.0, -1.0], [3.5, 6.0, 1.0]);

        let hit = cast(&scene.registry, &along_x()).unwrap();

        assert_relative_eq!(hit.t, 0.25, epsilon = 1e-6);
        assert_eq!(hit.volume, volume);
        assert_eq!(hit.owner, owner);
        assert_relative_eq!(hit.point, Vec3::new(2.5, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_nearest_of_two_wins_regardless_of_registration() {
        let mut scene = Scene::new();
        scene.place([6.0, -1.0, -1.0], [7.0, 1.0, 1.0]);
        let (near, _) = scene.place([2.0, -1.0, -1.0], [3.0, 1.0, 1.0]);

        let hit = cast(&scene.registry, &along_x()).unwrap();

        assert_eq!(hit.owner, near);
        assert_relative_eq!(hit.t, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_no_intersection_returns_none() {
        let mut scene = Scene::new();
        scene.place([2.0, 3.0, -1.0], [3.0, 4.0, 1.0]);
        scene.place([-5.0, -1.0, -1.0], [-4.0, 1.0, 1.0]);

        assert!(cast(&scene.registry, &along_x()).is_none());
        assert!(cast(&VolumeRegistry::new(), &along_x()).is_none());
    }

    #[test]
    fn test_equal_t_prefers_first_registered() {
        let mut scene = Scene::new();
        let (first, _) = scene.place([5.0, -1.0, -1.0], [6.0, 0.0, 1.0]);
        let (second, _) = scene.place([5.0, 0.0, -1.0], [6.0, 1.0, 1.0]);

        let hit = cast(&scene.registry, &along_x()).unwrap();

        assert_eq!(hit.owner, first);
        assert_ne!(hit.owner, second);
    }

    #[test]
    fn test_degenerate_segment_inside_one_box() {
        let mut scene = Scene::new();
        scene.place([-10.0, -10.0, -10.0], [-9.0, -9.0, -9.0]);
        let (inside, _) = scene.place([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let point = Vec3::new(1.0, 1.0, 1.0);

        let hit = cast(&scene.registry, &LineSegment::new(point, point)).unwrap();

        assert_eq!(hit.owner, inside);
        assert_eq!(hit.t, 0.0);
        assert_eq!(hit.point, point);
        assert_eq!(hit.normal, Vec3::zeros());

        let outside = Vec3::new(5.0, 5.0, 5.0);
        assert!(cast(&scene.registry, &LineSegment::new(outside, outside)).is_none());
    }

    #[test]
    fn test_filter_skips_excluded_owner() {
        let mut scene = Scene::new();
        let (shooter, _) = scene.place([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
        let (target, _) = scene.place([4.0, -1.0, -1.0], [5.0, 1.0, 1.0]);

        let unfiltered = cast(&scene.registry, &along_x()).unwrap();
        let filtered = cast_filtered(&scene.registry, &along_x(), |owner| owner != shooter).unwrap();

        assert_eq!(unfiltered.owner, shooter);
        assert_eq!(unfiltered.t, 0.0);
        assert_eq!(filtered.owner, target);
        assert_relative_eq!(filtered.t, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_cast_all_sorted_nearest_first() {
        let mut scene = Scene::new();
        let (far, _) = scene.place([8.0, -1.0, -1.0], [9.0, 1.0, 1.0]);
        let (near, _) = scene.place([1.0, -1.0, -1.0], [2.0, 1.0, 1.0]);
        scene.place([1.0, 4.0, -1.0], [2.0, 5.0, 1.0]);

        let view = scene.registry.cast_view();
        let hits = view.cast_all(&along_x());

        let owners: Vec<EntityId> = hits.iter().map(|hit| hit.owner).collect();
        assert_eq!(owners, vec![near, far]);
        assert_eq!(view.cast(&along_x()).map(|hit| hit.owner), Some(near));
    }
}
