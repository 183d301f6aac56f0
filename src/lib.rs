//! Demo driver for the colormapped spheres geometry.
//!
//! Builds a random particle cloud, shares it with a [`ColormappedSpheres`]
//! geometry colored by a piecewise linear transfer function, registers the
//! geometry with a [`Model`] and logs what the renderer would receive.
pub mod config;
pub mod particles;

use std::sync::Arc;

use anyhow::Context;
use scene::{ColormappedSpheres, Model, SphereData, TransferFunction};

use crate::config::Config;
use crate::particles::{random_atoms, Atom};

/// Everything the demo hands to the renderer.
pub struct DemoScene {
    pub model: Model,
    pub spheres: ColormappedSpheres,
    pub atoms: Vec<Atom>,
    pub transfer_function: Arc<TransferFunction>,
}

pub fn build_scene(config: &Config) -> anyhow::Result<DemoScene> {
    let atoms = random_atoms(&config.particles);
    log::info!("Generated {} particles", atoms.len());

    let transfer_function = Arc::new(
        TransferFunction::piecewise_linear(
            config.transfer_function.colors.clone(),
            config.transfer_function.opacities.clone(),
            config.value_range(),
        )
        .context("Failed to create transfer function")?,
    );

    let mut spheres = ColormappedSpheres::new(config.geometry.mode);
    spheres.set_spheres(SphereData::from_records(&atoms));
    spheres.set_transfer_function(Arc::clone(&transfer_function));
    spheres.set_params(config.geometry.params.clone());

    let mut model = Model::new();
    spheres
        .finalize(&mut model)
        .context("Failed to finalize colormapped spheres")?;

    Ok(DemoScene { model, spheres, atoms, transfer_function })
}

/// Loads the config (or the defaults), builds the scene and logs a summary.
pub fn run(config_path: Option<String>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => Config::new(&path).with_context(|| format!("Failed to load config {path}"))?,
        None => {
            log::info!("No config file given, using default values");
            Config::default()
        }
    };

    let scene = build_scene(&config)?;
    log_summary(&config, &scene);
    Ok(())
}

fn log_summary(config: &Config, scene: &DemoScene) {
    let bounds = scene.model.bounds();
    log::info!(
        "camera: position = {:?}, direction = {}, up = {:?}",
        config.camera.position,
        config.camera.direction(),
        config.camera.up
    );
    log::info!(
        "model: {} geometries, bounds min = {}, max = {}, size = {}",
        scene.model.len(),
        bounds.min,
        bounds.max,
        bounds.size()
    );

    let Some(descriptor) = scene.spheres.descriptor() else {
        return;
    };
    log::info!(
        "spheres: {} x {} bytes, radius {}, value range {:?}",
        descriptor.count(),
        descriptor.bytes_per_sphere(),
        descriptor.radius(),
        scene.transfer_function.value_range()
    );
    for (index, atom) in scene.atoms.iter().enumerate().take(5) {
        log::debug!(
            "sphere {index}: center {:?}, attribute {:.2}, color {:?}",
            atom.position,
            atom.attribute,
            descriptor.sphere_color(index)
        );
    }
}
