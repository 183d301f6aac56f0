use thiserror::Error;

/// Reasons a sphere geometry can't be finalized.
///
/// All of these are configuration errors. Nothing is registered with the
/// model when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("no '{0}' data specified")]
    MissingData(&'static str),
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("invalid sphere layout: {0}")]
    InvalidLayout(String),
    #[error(
        "too many spheres in this geometry ({count}, limit is {limit}); split it into \
         several geometries with fewer spheres"
    )]
    CapacityExceeded { count: usize, limit: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferFunctionError {
    #[error("transfer function needs at least one color")]
    NoColors,
    #[error("transfer function needs at least one opacity")]
    NoOpacities,
    #[error("invalid value range [{0}, {1}]")]
    InvalidRange(f32, f32),
}
