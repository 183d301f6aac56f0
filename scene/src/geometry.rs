use std::sync::Arc;

use serde::Deserialize;

use crate::bounds::BoundingBox;
use crate::data::SphereData;
use crate::error::GeometryError;
use crate::layout::SphereLayout;
use crate::model::{GeometryId, ModelHandle, Registration, SceneModel};
use crate::reader::PackedSpheres;
use crate::transfer_function::TransferFunction;

/// Which parameters a sphere geometry requires.
///
/// `Colormapped` needs an attribute offset and a transfer function,
/// `Unmapped` treats both as optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryMode {
    Unmapped,
    #[default]
    Colormapped,
}

/// Scalar parameters of a sphere geometry.
///
/// Offsets are byte offsets into one record; a negative offset marks the
/// field as absent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    /// Radius used for every sphere when there is no per-sphere radius.
    pub radius: f32,
    #[serde(rename = "materialID", alias = "material_id")]
    pub material_id: i32,
    pub bytes_per_sphere: usize,
    pub offset_center: i64,
    pub offset_radius: i64,
    pub offset_attribute: i64,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 0.01,
            material_id: 0,
            bytes_per_sphere: 4 * std::mem::size_of::<f32>(),
            offset_center: 0,
            offset_radius: -1,
            offset_attribute: -1,
        }
    }
}

/// Immutable description of a finalized sphere geometry, as consumed by
/// the model's intersection and shading stages.
#[derive(Clone, Debug)]
pub struct GeometryDescriptor {
    spheres: SphereData,
    layout: SphereLayout,
    count: usize,
    radius: f32,
    material_id: i32,
    transfer_function: Option<Arc<TransferFunction>>,
}

impl GeometryDescriptor {
    pub fn spheres(&self) -> &SphereData {
        &self.spheres
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bytes_per_sphere(&self) -> usize {
        self.layout.stride()
    }

    pub fn layout(&self) -> &SphereLayout {
        &self.layout
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material_id(&self) -> i32 {
        self.material_id
    }

    pub fn transfer_function(&self) -> Option<&Arc<TransferFunction>> {
        self.transfer_function.as_ref()
    }

    pub fn reader(&self) -> PackedSpheres<'_> {
        PackedSpheres::from_parts(self.spheres.bytes(), self.layout, self.radius, self.count)
    }

    /// Color of sphere `index`, taken from its attribute through the
    /// transfer function.
    pub fn sphere_color(&self, index: usize) -> Option<[f32; 4]> {
        let transfer_function = self.transfer_function.as_ref()?;
        let attribute = self.reader().attribute(index)?;
        Some(transfer_function.map(attribute))
    }
}

/// A set of spheres read from a packed, caller laid out byte buffer.
///
/// Parameters are set freely; nothing is checked until [`finalize`], which
/// validates them, computes the bounds and registers the result with a
/// model. Finalizing again replaces the previous registration.
///
/// [`finalize`]: ColormappedSpheres::finalize
#[derive(Debug)]
pub struct ColormappedSpheres {
    mode: GeometryMode,
    params: SphereParams,
    spheres: Option<SphereData>,
    transfer_function: Option<Arc<TransferFunction>>,

    descriptor: Option<Arc<GeometryDescriptor>>,
    bounds: BoundingBox,
    registration: Option<(ModelHandle, GeometryId)>,
}

impl ColormappedSpheres {
    pub fn new(mode: GeometryMode) -> Self {
        Self {
            mode,
            params: SphereParams::default(),
            spheres: None,
            transfer_function: None,
            descriptor: None,
            bounds: BoundingBox::empty(),
            registration: None,
        }
    }

    pub fn colormapped() -> Self {
        Self::new(GeometryMode::Colormapped)
    }

    pub fn unmapped() -> Self {
        Self::new(GeometryMode::Unmapped)
    }

    pub fn mode(&self) -> GeometryMode {
        self.mode
    }

    pub fn params(&self) -> &SphereParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SphereParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: SphereParams) {
        self.params = params;
    }

    pub fn set_spheres(&mut self, spheres: SphereData) {
        self.spheres = Some(spheres);
    }

    pub fn set_transfer_function(&mut self, transfer_function: Arc<TransferFunction>) {
        self.transfer_function = Some(transfer_function);
    }

    /// Descriptor of the last successful finalize.
    pub fn descriptor(&self) -> Option<&Arc<GeometryDescriptor>> {
        self.descriptor.as_ref()
    }

    /// Bounds of the last successful finalize, empty before that.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn registration(&self) -> Option<GeometryId> {
        self.registration.map(|(_, id)| id)
    }

    pub fn finalize<M>(&mut self, model: &mut M) -> Result<Arc<GeometryDescriptor>, GeometryError>
    where
        M: SceneModel + ?Sized,
    {
        let descriptor = self.build_descriptor().map_err(|err| {
            log::warn!("colormapped_spheres: {err}");
            err
        })?;

        log::info!("creating 'colormapped_spheres' geometry, #spheres = {}", descriptor.count());
        let bounds = descriptor.reader().bounds();
        log::debug!("colormapped_spheres bounds: min = {}, max = {}", bounds.min, bounds.max);

        let descriptor = Arc::new(descriptor);
        let registration = Registration { geometry: Arc::clone(&descriptor), bounds };
        let handle = model.handle();
        let id = match self.registration {
            Some((owner, id)) if owner == handle && model.replace_geometry(id, registration.clone()) => id,
            _ => model.register_geometry(registration),
        };

        self.registration = Some((handle, id));
        self.descriptor = Some(Arc::clone(&descriptor));
        self.bounds = bounds;
        Ok(descriptor)
    }

    /// Removes this geometry from the model it was registered with.
    pub fn release<M>(&mut self, model: &mut M) -> Option<Registration>
    where
        M: SceneModel + ?Sized,
    {
        match self.registration {
            Some((owner, id)) if owner == model.handle() => {
                self.registration = None;
                model.remove_geometry(id)
            }
            _ => None,
        }
    }

    fn build_descriptor(&self) -> Result<GeometryDescriptor, GeometryError> {
        let spheres = self.spheres.clone().ok_or(GeometryError::MissingData("spheres"))?;

        let transfer_function = match self.mode {
            GeometryMode::Colormapped => {
                if self.params.offset_attribute < 0 {
                    return Err(GeometryError::MissingParameter("offset_attribute"));
                }
                let transfer_function = self
                    .transfer_function
                    .clone()
                    .ok_or(GeometryError::MissingParameter("transfer_function"))?;
                Some(transfer_function)
            }
            GeometryMode::Unmapped => self.transfer_function.clone(),
        };

        let layout = SphereLayout::new(
            self.params.bytes_per_sphere,
            self.params.offset_center,
            self.params.offset_radius,
            self.params.offset_attribute,
        )?;
        // last gate: the record count is only derived from a valid layout
        let count = layout.record_count(spheres.num_bytes())?;

        Ok(GeometryDescriptor {
            spheres,
            layout,
            count,
            radius: self.params.radius,
            material_id: self.params.material_id,
            transfer_function,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use glam::Vec3;

    fn tf() -> Arc<TransferFunction> {
        Arc::new(TransferFunction::piecewise_linear(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], vec![1.0], [0.0, 1.0]).unwrap())
    }

    fn two_spheres() -> SphereData {
        SphereData::from_records(&[[0.0f32, 0.0, 0.0, 0.0], [10.0, 0.0, 0.0, 1.0]])
    }

    #[test]
    fn test_default_params() {
        let params = SphereParams::default();
        assert_eq!(params.radius, 0.01);
        assert_eq!(params.material_id, 0);
        assert_eq!(params.bytes_per_sphere, 16);
        assert_eq!(params.offset_center, 0);
        assert_eq!(params.offset_radius, -1);
        assert_eq!(params.offset_attribute, -1);
    }

    #[test]
    fn test_params_from_toml() {
        let params: SphereParams = toml::from_str("radius = 0.5\nmaterialID = 3\noffset_attribute = 12").unwrap();
        assert_eq!(params.radius, 0.5);
        assert_eq!(params.material_id, 3);
        assert_eq!(params.offset_attribute, 12);
        assert_eq!(params.bytes_per_sphere, 16);

        let params: SphereParams = toml::from_str("material_id = 2").unwrap();
        assert_eq!(params.material_id, 2);

        let mode: GeometryMode = toml::Value::String("unmapped".to_string()).try_into().unwrap();
        assert_eq!(mode, GeometryMode::Unmapped);
    }

    #[test]
    fn test_missing_spheres() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        assert_eq!(geometry.finalize(&mut model).unwrap_err(), GeometryError::MissingData("spheres"));

        let mut geometry = ColormappedSpheres::colormapped();
        assert_eq!(geometry.finalize(&mut model).unwrap_err(), GeometryError::MissingData("spheres"));
        assert!(model.is_empty());
    }

    #[test]
    fn test_colormapped_requires_attribute_offset() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::colormapped();
        geometry.set_spheres(two_spheres());
        geometry.set_transfer_function(tf());
        assert_eq!(
            geometry.finalize(&mut model).unwrap_err(),
            GeometryError::MissingParameter("offset_attribute")
        );
        assert!(geometry.descriptor().is_none());
        assert!(model.is_empty());
    }

    #[test]
    fn test_attribute_offset_checked_before_buffer() {
        // a stride of zero would fail layout validation if it was reached
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::colormapped();
        geometry.set_spheres(two_spheres());
        geometry.params_mut().bytes_per_sphere = 0;
        assert_eq!(
            geometry.finalize(&mut model).unwrap_err(),
            GeometryError::MissingParameter("offset_attribute")
        );
    }

    #[test]
    fn test_colormapped_requires_transfer_function() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::colormapped();
        geometry.set_spheres(two_spheres());
        geometry.params_mut().offset_attribute = 12;
        assert_eq!(
            geometry.finalize(&mut model).unwrap_err(),
            GeometryError::MissingParameter("transfer_function")
        );
    }

    #[test]
    fn test_unmapped_skips_colormap_checks() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        geometry.set_spheres(two_spheres());
        geometry.params_mut().radius = 0.5;

        let descriptor = geometry.finalize(&mut model).unwrap();
        assert_eq!(descriptor.count(), 2);
        assert!(descriptor.transfer_function().is_none());
        assert_eq!(descriptor.sphere_color(0), None);
        assert_eq!(geometry.bounds().min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(geometry.bounds().max, Vec3::new(10.5, 0.5, 0.5));
    }

    #[test]
    fn test_invalid_layout() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        geometry.set_spheres(two_spheres());
        geometry.params_mut().offset_radius = 14;
        assert!(matches!(geometry.finalize(&mut model), Err(GeometryError::InvalidLayout(_))));
        assert!(model.is_empty());
    }

    #[test]
    fn test_sphere_color() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::colormapped();
        geometry.set_spheres(two_spheres());
        geometry.set_transfer_function(tf());
        geometry.params_mut().offset_attribute = 12;

        let descriptor = geometry.finalize(&mut model).unwrap();
        assert_eq!(descriptor.sphere_color(0), Some([0.0, 0.0, 1.0, 1.0]));
        assert_eq!(descriptor.sphere_color(1), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(descriptor.sphere_color(2), None);
    }

    #[test]
    fn test_refinalize_replaces_registration() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        geometry.set_spheres(two_spheres());
        geometry.finalize(&mut model).unwrap();
        let id = geometry.registration().unwrap();

        geometry.params_mut().radius = 2.0;
        geometry.finalize(&mut model).unwrap();
        assert_eq!(geometry.registration(), Some(id));
        assert_eq!(model.len(), 1);
        assert_eq!(model.geometry(id).unwrap().bounds.max, Vec3::new(12.0, 2.0, 2.0));
        assert_eq!(model.geometry(id).unwrap().geometry.radius(), 2.0);
    }

    #[test]
    fn test_failed_refinalize_keeps_previous_state() {
        let mut model = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        geometry.set_spheres(two_spheres());
        geometry.params_mut().radius = 1.0;
        geometry.finalize(&mut model).unwrap();
        let bounds = geometry.bounds();

        geometry.params_mut().bytes_per_sphere = 0;
        assert!(geometry.finalize(&mut model).is_err());
        assert_eq!(geometry.bounds(), bounds);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_release() {
        let mut model = Model::new();
        let mut other = Model::new();
        let mut geometry = ColormappedSpheres::unmapped();
        geometry.set_spheres(two_spheres());
        geometry.finalize(&mut model).unwrap();

        assert!(geometry.release(&mut other).is_none());
        assert!(geometry.release(&mut model).is_some());
        assert!(model.is_empty());
        assert_eq!(geometry.registration(), None);
    }
}
