use glam::Vec3;
use rtbvh::Aabb;

/// Axis aligned bounding box.
///
/// Starts out empty (`min = +inf`, `max = -inf`) and only ever grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// The cube `[center - radius, center + radius]` enclosing a sphere.
    pub fn around_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            min: center - Vec3::splat(radius),
            max: center + Vec3::splat(radius),
        }
    }

    /// True if no geometry has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, other: &BoundingBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn extend_sphere(&mut self, center: Vec3, radius: f32) {
        self.extend(&Self::around_sphere(center, radius));
    }

    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.extend(other);
        self
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Folds a set of spheres into the tightest box containing all of them.
pub fn sphere_bounds<I>(spheres: I) -> BoundingBox
where
    I: IntoIterator<Item = (Vec3, f32)>,
{
    spheres.into_iter().fold(BoundingBox::empty(), |mut bounds, (center, radius)| {
        bounds.extend_sphere(center, radius);
        bounds
    })
}

// Hand-off format for the BVH builder.
impl From<BoundingBox> for Aabb {
    fn from(bounds: BoundingBox) -> Self {
        Aabb {
            min: bounds.min.to_array().into(),
            extra1: 0,
            max: bounds.max.to_array().into(),
            extra2: 0,
        }
    }
}
