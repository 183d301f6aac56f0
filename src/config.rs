use std::fs;

use glam::Vec3;
use scene::{GeometryMode, SphereParams};
use serde::Deserialize;
use thiserror::Error;

use crate::particles::Atom;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find/read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub up: [f32; 3],
    pub look_at: [f32; 3],
}

impl CameraConfig {
    pub fn direction(&self) -> Vec3 {
        Vec3::from(self.look_at) - Vec3::from(self.position)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 9.0],
            up: [0.0, 1.0, 0.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

/// Random particle cloud the demo builds its spheres from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub position_range: [f32; 2],
    pub attribute_range: [f32; 2],
    /// Fixed seed for reproducible clouds; random when absent.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            position_range: [-3.0, 3.0],
            attribute_range: [25.0, 100.0],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransferFunctionConfig {
    pub colors: Vec<[f32; 3]>,
    pub opacities: Vec<f32>,
    /// Defaults to the particle attribute range.
    pub value_range: Option<[f32; 2]>,
}

impl Default for TransferFunctionConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                [0.0, 0.0, 0.5],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.5, 1.0, 0.5],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 0.0, 0.0],
            ],
            opacities: vec![1.0, 1.0],
            value_range: None,
        }
    }
}

/// Mode plus the sphere parameters, read from the same table.
///
/// Keys missing from a present `[geometry]` table take the library defaults
/// of [`SphereParams`]; without the table the demo's [`Atom`] layout is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeometryConfig {
    #[serde(default)]
    pub mode: GeometryMode,
    #[serde(flatten)]
    pub params: SphereParams,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            mode: GeometryMode::Colormapped,
            params: SphereParams {
                radius: 0.35,
                bytes_per_sphere: Atom::BYTES,
                offset_center: Atom::OFFSET_CENTER,
                offset_attribute: Atom::OFFSET_ATTRIBUTE,
                ..SphereParams::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    pub transfer_function: TransferFunctionConfig,
    pub geometry: GeometryConfig,
}

/// Top level tables as they appear in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    camera: Option<CameraConfig>,
    particles: Option<ParticleConfig>,
    transfer_function: Option<TransferFunctionConfig>,
    geometry: Option<GeometryConfig>,
}

fn section_or_default<T: Default>(section: Option<T>, name: &str) -> T {
    section.unwrap_or_else(|| {
        log::info!("No {name} defined in config, using default values");
        T::default()
    })
}

impl Config {
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        let toml_str = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_string(),
            source,
        })?;
        Self::from_str(&toml_str)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        let config = Config {
            camera: section_or_default(file.camera, "camera"),
            particles: section_or_default(file.particles, "particles"),
            transfer_function: section_or_default(file.transfer_function, "transfer_function"),
            geometry: section_or_default(file.geometry, "geometry"),
        };
        if config.transfer_function.value_range.is_none() {
            log::info!("No transfer_function.value_range defined in config, using the particle attribute range");
        }
        config.validate()?;
        Ok(config)
    }

    /// Value range of the transfer function, falling back to the particle
    /// attribute range.
    pub fn value_range(&self) -> [f32; 2] {
        self.transfer_function.value_range.unwrap_or(self.particles.attribute_range)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("particles.position_range", self.particles.position_range)?;
        check_range("particles.attribute_range", self.particles.attribute_range)?;
        if let Some(range) = self.transfer_function.value_range {
            check_range("transfer_function.value_range", range)?;
        }
        if self.transfer_function.colors.is_empty() {
            return Err(ConfigError::Invalid("transfer_function.colors must not be empty".to_string()));
        }
        if self.transfer_function.opacities.is_empty() {
            return Err(ConfigError::Invalid("transfer_function.opacities must not be empty".to_string()));
        }
        let radius = self.geometry.params.radius;
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "geometry.radius must be a non-negative number, got {radius}"
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, [lo, hi]: [f32; 2]) -> Result<(), ConfigError> {
    if lo.is_finite() && hi.is_finite() && lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} [{lo}, {hi}] is not a valid range")))
    }
}
