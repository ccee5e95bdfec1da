//! Entity handles and the transform lookup consumed by the collision core
//!
//! The collision core never owns entities. Volumes hold an [`EntityId`] and
//! resolve it through a [`TransformSource`] once per step; a handle that no
//! longer resolves means the owner is gone.

use crate::foundation::math::{Mat4, Transform, Vec3};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to a world entity
    pub struct EntityId;
}

/// Read access to entity transforms, supplied by whoever owns the entities
pub trait TransformSource {
    /// World matrix of the entity, `None` if the handle is stale
    fn world_transform(&self, entity: EntityId) -> Option<Mat4>;

    /// World position of the entity
    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Unit facing direction of the entity
    fn forward(&self, entity: EntityId) -> Option<Vec3>;
}

/// Minimal entity store: a slot map of transforms
///
/// Used by tests and the demo driver; real games plug in their own
/// [`TransformSource`].
#[derive(Debug, Default)]
pub struct EntityTable {
    transforms: SlotMap<EntityId, Transform>,
}

impl EntityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with the given transform
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        self.transforms.insert(transform)
    }

    /// Destroy an entity; its handle never resolves again
    pub fn despawn(&mut self, entity: EntityId) -> Option<Transform> {
        self.transforms.remove(entity)
    }

    /// Transform of a live entity
    pub fn get(&self, entity: EntityId) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    /// Mutable transform of a live entity
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    /// Whether the handle still resolves
    pub fn contains(&self, entity: EntityId) -> bool {
        self.transforms.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Iterate live entities and their transforms
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Transform)> {
        self.transforms.iter()
    }
}

impl TransformSource for EntityTable {
    fn world_transform(&self, entity: EntityId) -> Option<Mat4> {
        self.transforms.get(entity).map(Transform::to_matrix)
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.transforms.get(entity).map(|t| t.position)
    }

    fn forward(&self, entity: EntityId) -> Option<Vec3> {
        self.transforms.get(entity).map(Transform::forward)
    }
}
