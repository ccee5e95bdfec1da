//! Sweep-and-prune must report exactly the pairs the brute-force reference does
//!
//! Randomized scenes use a seeded `StdRng`, so failures reproduce.

use collision_engine::physics::collision::overlaps;
use collision_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

struct Scene {
    entities: EntityTable,
    registry: VolumeRegistry,
}

impl Scene {
    fn from_boxes(boxes: &[(Vec3, Vec3)]) -> Self {
        let mut entities = EntityTable::new();
        let mut registry = VolumeRegistry::new();
        for &(min, max) in boxes {
            let owner = entities.spawn(Transform::identity());
            registry.add(BoundingVolume::new(owner, Aabb::new(min, max).unwrap()));
        }
        registry.refresh(&entities).unwrap();
        Self { entities, registry }
    }
}

fn pair_set(pairs: &[(EntityId, EntityId)]) -> HashSet<(EntityId, EntityId)> {
    pairs
        .iter()
        .map(|&(a, b)| if a <= b { (a, b) } else { (b, a) })
        .collect()
}

/// Runs both strategies and checks the pair contract, returning the pair count
fn assert_equivalent(registry: &VolumeRegistry) -> usize {
    let reference = BruteForce.collect_pairs(registry);
    let swept = SweepAndPrune.collect_pairs(registry);

    for pairs in [&reference, &swept] {
        assert!(pairs.iter().all(|(a, b)| a != b), "self pair reported");
        assert_eq!(pair_set(pairs).len(), pairs.len(), "pair reported twice");
    }
    assert_eq!(pair_set(&swept), pair_set(&reference));
    reference.len()
}

fn random_boxes(rng: &mut StdRng, count: usize, arena: f32, max_size: f32) -> Vec<(Vec3, Vec3)> {
    (0..count)
        .map(|_| {
            let min = Vec3::new(
                rng.gen_range(-arena..arena),
                rng.gen_range(-arena..arena),
                rng.gen_range(-arena..arena),
            );
            let size = Vec3::new(
                rng.gen_range(0.0..max_size),
                rng.gen_range(0.0..max_size),
                rng.gen_range(0.0..max_size),
            );
            (min, min + size)
        })
        .collect()
}

/// Integer-lattice boxes: lots of exactly shared faces, edges and min ties
fn lattice_boxes(rng: &mut StdRng, count: usize) -> Vec<(Vec3, Vec3)> {
    (0..count)
        .map(|_| {
            let min = Vec3::new(
                f32::from(rng.gen_range(0u8..8)),
                f32::from(rng.gen_range(0u8..8)),
                f32::from(rng.gen_range(0u8..8)),
            );
            let size = Vec3::new(
                f32::from(rng.gen_range(0u8..3)),
                f32::from(rng.gen_range(0u8..3)),
                f32::from(rng.gen_range(0u8..3)),
            );
            (min, min + size)
        })
        .collect()
}

#[test]
fn random_scenes_match_reference() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        for count in [0, 1, 2, 50] {
            let scene = Scene::from_boxes(&random_boxes(&mut rng, count, 20.0, 8.0));
            assert_equivalent(&scene.registry);
        }
    }
}

#[test]
fn lattice_scenes_match_reference() {
    for seed in 100..120 {
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = Scene::from_boxes(&lattice_boxes(&mut rng, 50));
        assert_equivalent(&scene.registry);
    }
}

#[test]
fn overlap_test_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(3);
    let boxes: Vec<Aabb> = lattice_boxes(&mut rng, 40)
        .into_iter()
        .map(|(min, max)| Aabb::new(min, max).unwrap())
        .collect();

    for a in &boxes {
        assert!(overlaps(a, a));
        for b in &boxes {
            assert_eq!(overlaps(a, b), overlaps(b, a));
        }
    }
}

#[test]
fn empty_and_single_scenes_have_no_pairs() {
    assert_eq!(assert_equivalent(&Scene::from_boxes(&[]).registry), 0);

    let single = Scene::from_boxes(&[(Vec3::zeros(), Vec3::repeat(1.0))]);
    assert_eq!(assert_equivalent(&single.registry), 0);
}

#[test]
fn identical_boxes_pair_with_everyone() {
    let boxes = vec![(Vec3::repeat(-1.0), Vec3::repeat(1.0)); 12];
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 12 * 11 / 2);
}

#[test]
fn sorted_disjoint_boxes_have_no_pairs() {
    let boxes: Vec<(Vec3, Vec3)> = (0..50u8)
        .map(|i| {
            let x = f32::from(i) * 2.0;
            (Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0))
        })
        .collect();
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 0);
}

#[test]
fn two_axis_overlap_without_third_has_no_pairs() {
    // Every box overlaps every other on x and y; z layers never touch
    let boxes: Vec<(Vec3, Vec3)> = (0..20u8)
        .map(|i| {
            let z = f32::from(i) * 3.0;
            (Vec3::new(0.0, 0.0, z), Vec3::new(10.0, 10.0, z + 1.0))
        })
        .collect();
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 0);

    // And the mirror: overlap on y and z, separated on x
    let boxes: Vec<(Vec3, Vec3)> = (0..20u8)
        .map(|i| {
            let x = f32::from(i) * 3.0;
            (Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 10.0, 10.0))
        })
        .collect();
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 0);
}

#[test]
fn boxes_touching_at_one_coordinate_pair_up() {
    // A chain along x where each box starts exactly where the previous ends
    let boxes: Vec<(Vec3, Vec3)> = (0..10u8)
        .map(|i| {
            let x = f32::from(i);
            (Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0))
        })
        .collect();
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 9);

    // Corner-to-corner diagonal chain
    let boxes: Vec<(Vec3, Vec3)> = (0..10u8)
        .map(|i| {
            let c = f32::from(i);
            (Vec3::repeat(c), Vec3::repeat(c + 1.0))
        })
        .collect();
    let scene = Scene::from_boxes(&boxes);
    assert_eq!(assert_equivalent(&scene.registry), 9);
}

#[test]
fn owners_with_several_volumes_are_reported_once() {
    for seed in 200..210 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut entities = EntityTable::new();
        let mut registry = VolumeRegistry::new();
        for (min, max) in lattice_boxes(&mut rng, 45) {
            // About half the boxes join the previous owner
            let owner = match registry.iter().last() {
                Some((_, volume)) if rng.gen_bool(0.5) => volume.owner(),
                _ => entities.spawn(Transform::identity()),
            };
            registry.add(BoundingVolume::new(owner, Aabb::new(min, max).unwrap()));
        }
        registry.refresh(&entities).unwrap();

        assert_equivalent(&registry);
        assert_eq!(
            BruteForce.collect_pairs(&registry),
            SweepAndPrune.collect_pairs(&registry)
        );
    }
}

#[test]
fn moving_scene_stays_consistent_and_equivalent() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scene = Scene::from_boxes(&random_boxes(&mut rng, 30, 15.0, 4.0));
    let mut live: Vec<VolumeId> = scene.registry.registered().to_vec();

    for _ in 0..40 {
        // Drift every entity
        let owners: Vec<EntityId> = scene.entities.iter().map(|(id, _)| id).collect();
        for owner in owners {
            if let Some(transform) = scene.entities.get_mut(owner) {
                transform.position += Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
            }
        }

        // Occasionally register a newcomer or drop a random volume
        if rng.gen_bool(0.3) {
            let owner = scene.entities.spawn(Transform::from_position(Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            )));
            let local = Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(2.0)).unwrap();
            live.push(scene.registry.add(BoundingVolume::new(owner, local)));
        }
        if rng.gen_bool(0.3) && !live.is_empty() {
            let id = live.swap_remove(rng.gen_range(0..live.len()));
            scene.registry.remove(id).unwrap();
        }

        scene.registry.refresh(&scene.entities).unwrap();
        assert!(scene.registry.is_consistent());
        assert_equivalent(&scene.registry);
    }
}
