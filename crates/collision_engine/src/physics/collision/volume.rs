//! Owner-attached bounding volumes
//!
//! A volume stores its box in the owner's local space and caches the world
//! box computed from the owner's world matrix at the last refresh. Only the
//! owner handle is kept, so a destroyed owner leaves nothing dangling.

use super::primitives::Aabb;
use crate::error::Result;
use crate::foundation::math::{matrix_scale, matrix_translation, Mat4};
use crate::scene::EntityId;

/// Axis-aligned volume attached to one entity
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingVolume {
    owner: EntityId,
    local: Aabb,
    rotates_with_owner: bool,
    world: Aabb,
}

impl BoundingVolume {
    /// Create a volume from an owner-space box
    ///
    /// The world box equals the local box until the first refresh.
    pub fn new(owner: EntityId, local: Aabb) -> Self {
        Self {
            owner,
            local,
            rotates_with_owner: false,
            world: local,
        }
    }

    /// Re-bound the rotated box instead of ignoring owner rotation
    ///
    /// Off by default: spinning objects keep a stable box that only follows
    /// translation and scale.
    #[must_use]
    pub fn with_rotation(mut self, rotates_with_owner: bool) -> Self {
        self.rotates_with_owner = rotates_with_owner;
        self
    }

    /// Entity this volume belongs to
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Owner-space box
    pub fn local(&self) -> &Aabb {
        &self.local
    }

    /// World-space box as of the last refresh
    pub fn world(&self) -> &Aabb {
        &self.world
    }

    /// Whether owner rotation is applied
    pub fn rotates_with_owner(&self) -> bool {
        self.rotates_with_owner
    }

    /// World box for the given owner matrix, without storing it
    pub fn compute_world(&self, owner_matrix: &Mat4) -> Result<Aabb> {
        if self.rotates_with_owner {
            return self.local.transformed(owner_matrix);
        }
        let scale = matrix_scale(owner_matrix);
        let translation = matrix_translation(owner_matrix);
        Aabb::new(
            self.local.min().component_mul(&scale) + translation,
            self.local.max().component_mul(&scale) + translation,
        )
    }

    /// Recompute and store the world box from the owner matrix
    pub fn update_world(&mut self, owner_matrix: &Mat4) -> Result<()> {
        self.world = self.compute_world(owner_matrix)?;
        Ok(())
    }

    pub(crate) fn set_world(&mut self, world: Aabb) {
        self.world = world;
    }
}
