use std::sync::Arc;

use bytemuck::Pod;

/// Shared, immutable byte buffer holding packed sphere records.
///
/// Cloning is cheap and never copies the bytes, so the application, the
/// geometry and the model all see the same buffer.
#[derive(Clone, Debug)]
pub struct SphereData {
    bytes: Arc<[u8]>,
}

impl SphereData {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// Packs a slice of plain-old-data records into a new buffer.
    pub fn from_records<T: Pod>(records: &[T]) -> Self {
        Self::new(bytemuck::cast_slice::<T, u8>(records))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn num_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// True if both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &SphereData) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}
