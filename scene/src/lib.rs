//! # Scene
//!
//! The "colormapped spheres" geometry: spheres read from a packed byte buffer
//! with a caller declared record layout, colored by a transfer function over
//! one scalar attribute per sphere.
//!
//! ## Modules
//!
//! - `data`: Shared byte buffer holding the packed sphere records.
//! - `layout`: Validated byte layout of one record and the record count limit.
//! - `reader`: Bounds checked access to centers, radii and attributes.
//! - `bounds`: Axis aligned bounding box accumulation.
//! - `transfer_function`: Piecewise linear attribute to color mapping.
//! - `geometry`: Parameter validation and the finalized geometry descriptor.
//! - `model`: The host model geometries register with.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use scene::{ColormappedSpheres, Model, SphereData, TransferFunction};
//!
//! // x, y, z, attribute
//! let atoms = [[0.0f32, 0.0, 0.0, 25.0], [10.0, 0.0, 0.0, 100.0]];
//! let colors = TransferFunction::piecewise_linear(
//!     vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
//!     vec![1.0],
//!     [25.0, 100.0],
//! ).unwrap();
//!
//! let mut spheres = ColormappedSpheres::colormapped();
//! spheres.set_spheres(SphereData::from_records(&atoms));
//! spheres.set_transfer_function(Arc::new(colors));
//! spheres.params_mut().radius = 0.5;
//! spheres.params_mut().offset_attribute = 12;
//!
//! let mut model = Model::new();
//! let descriptor = spheres.finalize(&mut model).unwrap();
//! assert_eq!(descriptor.count(), 2);
//! assert_eq!(spheres.bounds().max.x, 10.5);
//! ```
mod bounds;
mod data;
mod error;
mod geometry;
mod layout;
mod model;
mod reader;
mod transfer_function;

pub use bounds::{sphere_bounds, BoundingBox};
pub use data::SphereData;
pub use error::{GeometryError, TransferFunctionError};
pub use geometry::{ColormappedSpheres, GeometryDescriptor, GeometryMode, SphereParams};
pub use layout::{SphereLayout, MAX_SPHERES};
pub use model::{GeometryId, Model, ModelHandle, Registration, SceneModel};
pub use reader::PackedSpheres;
pub use transfer_function::TransferFunction;
