use crate::error::GeometryError;

/// Upper bound (exclusive) on the number of spheres in one geometry.
///
/// Larger arrays overflow the 32-bit primitive indices used by the
/// intersection stage.
pub const MAX_SPHERES: usize = 1 << 30;

const VEC3_BYTES: usize = 3 * std::mem::size_of::<f32>();
const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Byte layout of one record in a packed sphere array.
///
/// Built from the raw geometry parameters, where a negative offset means
/// "field not present". Every present field is guaranteed to fit inside
/// `stride`, so reads through [`crate::PackedSpheres`] never cross into the
/// next record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SphereLayout {
    stride: usize,
    center: usize,
    radius: Option<usize>,
    attribute: Option<usize>,
}

impl SphereLayout {
    pub fn new(
        stride: usize,
        offset_center: i64,
        offset_radius: i64,
        offset_attribute: i64,
    ) -> Result<Self, GeometryError> {
        if stride == 0 {
            return Err(GeometryError::InvalidLayout(
                "bytes_per_sphere must be greater than zero".to_string(),
            ));
        }

        let center = field_offset("offset_center", offset_center, VEC3_BYTES, stride)?.ok_or_else(|| {
            GeometryError::InvalidLayout(format!("offset_center must not be negative (got {offset_center})"))
        })?;
        let radius = field_offset("offset_radius", offset_radius, F32_BYTES, stride)?;
        let attribute = field_offset("offset_attribute", offset_attribute, F32_BYTES, stride)?;

        Ok(Self { stride, center, radius, attribute })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn center_offset(&self) -> usize {
        self.center
    }

    pub fn radius_offset(&self) -> Option<usize> {
        self.radius
    }

    pub fn attribute_offset(&self) -> Option<usize> {
        self.attribute
    }

    /// Number of whole records in a buffer of `num_bytes` bytes.
    ///
    /// A trailing partial record is dropped without complaint.
    pub fn record_count(&self, num_bytes: usize) -> Result<usize, GeometryError> {
        let count = num_bytes / self.stride;
        if count >= MAX_SPHERES {
            return Err(GeometryError::CapacityExceeded { count, limit: MAX_SPHERES });
        }
        Ok(count)
    }
}

// Negative offsets mean the field is absent.
fn field_offset(name: &str, offset: i64, width: usize, stride: usize) -> Result<Option<usize>, GeometryError> {
    if offset < 0 {
        return Ok(None);
    }
    let start = usize::try_from(offset)
        .map_err(|_| GeometryError::InvalidLayout(format!("{name} {offset} does not fit in memory")))?;
    match start.checked_add(width) {
        Some(end) if end <= stride => Ok(Some(start)),
        _ => Err(GeometryError::InvalidLayout(format!(
            "{name} {offset} + {width} bytes exceeds bytes_per_sphere {stride}"
        ))),
    }
}
