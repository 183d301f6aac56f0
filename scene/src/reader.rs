use glam::Vec3;

use crate::bounds::{sphere_bounds, BoundingBox};
use crate::error::GeometryError;
use crate::layout::SphereLayout;

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Read-only view of a packed sphere array.
///
/// Every accessor is bounds checked: an index past the last whole record
/// yields `None`.
#[derive(Clone, Copy, Debug)]
pub struct PackedSpheres<'a> {
    bytes: &'a [u8],
    layout: SphereLayout,
    default_radius: f32,
    count: usize,
}

impl<'a> PackedSpheres<'a> {
    pub fn new(bytes: &'a [u8], layout: SphereLayout, default_radius: f32) -> Result<Self, GeometryError> {
        let count = layout.record_count(bytes.len())?;
        Ok(Self { bytes, layout, default_radius, count })
    }

    // `count` must come from `layout.record_count(bytes.len())`.
    pub(crate) fn from_parts(bytes: &'a [u8], layout: SphereLayout, default_radius: f32, count: usize) -> Self {
        Self { bytes, layout, default_radius, count }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn layout(&self) -> &SphereLayout {
        &self.layout
    }

    fn record(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.layout.stride();
        self.bytes.get(start..start + self.layout.stride())
    }

    pub fn center(&self, index: usize) -> Option<Vec3> {
        let record = self.record(index)?;
        let offset = self.layout.center_offset();
        Some(Vec3::new(
            read_f32(record, offset)?,
            read_f32(record, offset + F32_BYTES)?,
            read_f32(record, offset + 2 * F32_BYTES)?,
        ))
    }

    /// Per-record radius, or the default radius when the layout has none.
    pub fn radius(&self, index: usize) -> Option<f32> {
        let record = self.record(index)?;
        match self.layout.radius_offset() {
            Some(offset) => read_f32(record, offset),
            None => Some(self.default_radius),
        }
    }

    pub fn attribute(&self, index: usize) -> Option<f32> {
        let record = self.record(index)?;
        read_f32(record, self.layout.attribute_offset()?)
    }

    pub fn sphere(&self, index: usize) -> Option<(Vec3, f32)> {
        Some((self.center(index)?, self.radius(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vec3, f32)> + '_ {
        (0..self.count).filter_map(move |index| self.sphere(index))
    }

    pub fn bounds(&self) -> BoundingBox {
        sphere_bounds(self.iter())
    }
}

fn read_f32(record: &[u8], offset: usize) -> Option<f32> {
    record
        .get(offset..offset + F32_BYTES)
        .map(bytemuck::pod_read_unaligned::<f32>)
}
