//! Physics module for collision detection
//!
//! Overlap detection and nearest-hit queries over axis-aligned volumes.
//! There is no collision response here: callers decide what an overlap or
//! a hit means.

pub mod broad_phase;
pub mod collision;
pub mod collision_system;
pub mod registry;
pub mod segment_cast;

pub use broad_phase::{BroadPhase, BroadPhaseKind, BruteForce, SweepAndPrune};
pub use collision::{Aabb, Axis, BoundingVolume, LineSegment, SegmentIntersection};
pub use collision_system::CollisionWorld;
pub use registry::{RefreshReport, VolumeId, VolumeRegistry};
pub use segment_cast::{CastView, Hit};
