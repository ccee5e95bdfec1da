//! Collision engine errors
//!
//! Only construction and mutation can fail. Broad-phase passes and segment
//! casts over a well-formed registry always complete.

use crate::physics::VolumeId;
use crate::scene::EntityId;
use thiserror::Error;

/// Errors raised by volume construction and registry mutation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// A box with `min > max` (or a NaN component) on some axis
    #[error("Invalid bounds: min {min:?} exceeds max {max:?}")]
    InvalidBounds {
        /// Offending minimum corner
        min: [f32; 3],
        /// Offending maximum corner
        max: [f32; 3],
    },

    /// The volume is not registered (never added, or already removed)
    #[error("Volume not found: {0:?}")]
    NotFound(VolumeId),

    /// The volume's owner does not resolve to a live entity
    #[error("Owner not found: {0:?}")]
    OwnerNotFound(EntityId),
}

/// Result alias for collision operations
pub type Result<T> = std::result::Result<T, CollisionError>;
