//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Boxes, segments and the pure overlap/intersection tests
//! - [`volume`] - Owner-attached volumes rebuilt from world transforms
//!
//! # Key Types
//!
//! - [`Aabb`] - Validated axis-aligned box
//! - [`LineSegment`] - Finite segment used by casts
//! - [`BoundingVolume`] - Local box plus owner handle, cached world box

pub mod primitives;
pub mod volume;

pub use primitives::{cast_segment, overlaps, Aabb, Axis, LineSegment, SegmentIntersection};
pub use volume::BoundingVolume;
