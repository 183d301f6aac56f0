use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtbvh::Aabb;

use crate::bounds::BoundingBox;
use crate::geometry::GeometryDescriptor;

static NEXT_MODEL_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a model, stable for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelHandle(u64);

/// Slot of a registered geometry inside one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(usize);

/// A finalized geometry together with its world space bounds.
#[derive(Clone, Debug)]
pub struct Registration {
    pub geometry: Arc<GeometryDescriptor>,
    pub bounds: BoundingBox,
}

/// The host side of geometry registration.
///
/// Geometries hand their finalized description to the model, which owns
/// it from then on and feeds it to intersection and shading.
pub trait SceneModel {
    fn handle(&self) -> ModelHandle;

    fn register_geometry(&mut self, registration: Registration) -> GeometryId;

    /// Swaps the registration in slot `id`. Returns false if the slot is
    /// unknown to this model.
    fn replace_geometry(&mut self, id: GeometryId, registration: Registration) -> bool;

    fn remove_geometry(&mut self, id: GeometryId) -> Option<Registration>;
}

/// In-process model keeping every registered geometry.
#[derive(Debug)]
pub struct Model {
    handle: ModelHandle,
    next_id: usize,
    geometries: BTreeMap<GeometryId, Registration>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            handle: ModelHandle(NEXT_MODEL_HANDLE.fetch_add(1, Ordering::Relaxed)),
            next_id: 0,
            geometries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Registration> {
        self.geometries.get(&id)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Registration)> {
        self.geometries.iter().map(|(id, registration)| (*id, registration))
    }

    /// Union of the bounds of every registered geometry.
    pub fn bounds(&self) -> BoundingBox {
        self.geometries
            .values()
            .fold(BoundingBox::empty(), |bounds, registration| bounds.union(&registration.bounds))
    }

    /// Per-geometry boxes for the top level acceleration structure. Empty
    /// geometries are skipped.
    pub fn aabbs(&self) -> Vec<Aabb> {
        self.geometries
            .values()
            .filter(|registration| !registration.bounds.is_empty())
            .map(|registration| registration.bounds.into())
            .collect()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneModel for Model {
    fn handle(&self) -> ModelHandle {
        self.handle
    }

    fn register_geometry(&mut self, registration: Registration) -> GeometryId {
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "model {:?}: registered geometry {:?} with {} spheres",
            self.handle,
            id,
            registration.geometry.count()
        );
        self.geometries.insert(id, registration);
        id
    }

    fn replace_geometry(&mut self, id: GeometryId, registration: Registration) -> bool {
        match self.geometries.get_mut(&id) {
            Some(slot) => {
                *slot = registration;
                true
            }
            None => false,
        }
    }

    fn remove_geometry(&mut self, id: GeometryId) -> Option<Registration> {
        self.geometries.remove(&id)
    }
}
