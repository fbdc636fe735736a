//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy::winit::{UpdateMode, WinitSettings};

use vitrina_core::viewport::cap_pixel_ratio;
use vitrina_core::{PortfolioConfig, ViewerConfig};
use vitrina_scene::{PendingPageResizes, ViewerSettings, VitrinaScenePlugin};

use crate::overlay::bind_overlay;
use crate::page::{device_pixel_ratio, forward_page_resizes};

/// Canvas resolution: the configured logical size at the capped pixel ratio
fn canvas_resolution(config: &ViewerConfig, device_pixel_ratio: f64) -> WindowResolution {
    let [width, height] = config.display_size;
    let mut resolution = WindowResolution::default()
        .with_scale_factor_override(cap_pixel_ratio(device_pixel_ratio, config.max_pixel_ratio));
    resolution.set(width as f32, height as f32);
    resolution
}

/// Bind the overlay and run the viewer
pub fn run(config: PortfolioConfig) {
    // The overlay does not depend on the 3D scene
    bind_overlay(&config.overlay);

    // The canvas has a fixed size, so page resizes are forwarded by hand
    let page_resizes = PendingPageResizes::default();
    if let Err(e) = forward_page_resizes(page_resizes.clone()) {
        tracing::warn!("Page resizes will not reach the viewer: {:#}", e);
    }

    let viewer = config.viewer;
    let resolution = canvas_resolution(&viewer, device_pixel_ratio());
    tracing::info!(
        "Starting viewer on {} ({}x{} logical, pixel ratio {})",
        viewer.canvas,
        viewer.display_size[0],
        viewer.display_size[1],
        resolution.scale_factor()
    );

    App::new()
        // Transparent so the page shows through behind the model
        .insert_resource(ClearColor(Color::NONE))
        // Redraw every frame even without input; the model is always moving
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::Continuous,
        })
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Vitrina".to_string(),
                    canvas: Some(viewer.canvas.clone()),
                    resolution,
                    transparent: true,
                    fit_canvas_to_parent: false,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Asset paths are relative to the page root
                file_path: "".to_string(),
                // Static hosting has no .meta files
                meta_check: AssetMetaCheck::Never,
                ..default()
            })
        )
        .insert_resource(ViewerSettings(viewer))
        .insert_resource(page_resizes)
        .add_plugins(VitrinaScenePlugin)
        .run();
}
