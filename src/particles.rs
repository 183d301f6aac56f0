use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;

/// One particle as laid out in the shared sphere buffer: a center followed
/// by the attribute the transfer function colors by.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Atom {
    pub position: [f32; 3],
    pub attribute: f32,
}

impl Atom {
    pub const BYTES: usize = std::mem::size_of::<Atom>();
    pub const OFFSET_CENTER: i64 = 0;
    pub const OFFSET_ATTRIBUTE: i64 = (3 * std::mem::size_of::<f32>()) as i64;

    pub fn new(x: f32, y: f32, z: f32, attribute: f32) -> Self {
        Self { position: [x, y, z], attribute }
    }
}

pub fn random_atoms(config: &ParticleConfig) -> Vec<Atom> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let [pos_lo, pos_hi] = config.position_range;
    let [attr_lo, attr_hi] = config.attribute_range;

    (0..config.count)
        .map(|_| {
            Atom::new(
                rng.gen_range(pos_lo..=pos_hi),
                rng.gen_range(pos_lo..=pos_hi),
                rng.gen_range(pos_lo..=pos_hi),
                rng.gen_range(attr_lo..=attr_hi),
            )
        })
        .collect()
}
