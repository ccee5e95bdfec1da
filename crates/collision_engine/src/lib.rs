//! # Collision Engine
//!
//! Axis-aligned collision volumes for moving game entities.
//!
//! ## Features
//!
//! - **Bounding Volumes**: world-space boxes rebuilt from owner transforms every step
//! - **Broad Phase**: sweep-and-prune over three axis-sorted views, with an
//!   `O(n²)` reference strategy that produces the same pair set
//! - **Segment Casts**: nearest-hit queries for aiming and line of sight
//! - **Generational Handles**: owners are referenced by handle, never by pointer
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let mut entities = EntityTable::new();
//!     let ship = entities.spawn(Transform::from_position(Vec3::new(0.0, 0.0, 0.0)));
//!     let rock = entities.spawn(Transform::from_position(Vec3::new(1.5, 0.0, 0.0)));
//!
//!     let mut world = CollisionWorld::new(CollisionConfig::default());
//!     world.add(&entities, BoundingVolume::new(ship, Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(1.0))?))?;
//!     world.add(&entities, BoundingVolume::new(rock, Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(1.0))?))?;
//!
//!     // Once per simulation step, after transforms moved
//!     world.refresh(&entities)?;
//!     world.run_broad_phase(|a, b| println!("{a:?} touches {b:?}"));
//!
//!     let aim = LineSegment::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
//!     if let Some(hit) = world.cast(&aim) {
//!         println!("hit {:?} at t = {}", hit.owner, hit.t);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod scene;

pub use error::{CollisionError, Result};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        error::{CollisionError, Result},
        foundation::math::{Mat4, Quat, Transform, Vec3},
        physics::{
            Aabb, Axis, BoundingVolume, BroadPhase, BroadPhaseKind, BruteForce, CastView,
            CollisionWorld, Hit, LineSegment, RefreshReport, SweepAndPrune, VolumeId,
            VolumeRegistry,
        },
        scene::{EntityId, EntityTable, TransformSource},
    };
}
