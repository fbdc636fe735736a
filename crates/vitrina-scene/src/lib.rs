//! Vitrina Scene - Bevy side of the portfolio model viewer
//!
//! Plugins that bootstrap the camera and lights, load and frame the showcased
//! model, animate it, and drive the orbit camera. Everything engine-free lives
//! in `vitrina-core`; this crate wires it into bevy schedules.

pub mod animation;
pub mod camera;
pub mod models;
pub mod scene;

use bevy::prelude::*;
use vitrina_core::ViewerConfig;

/// Viewer configuration as a bevy resource
#[derive(Debug, Clone, Default, Resource, Deref)]
pub struct ViewerSettings(pub ViewerConfig);

/// Plugin that sets up the whole viewer
///
/// Insert `ViewerSettings` before adding the plugin to override the defaults.
pub struct VitrinaScenePlugin;

impl Plugin for VitrinaScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerSettings>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(animation::AnimationPlugin);
    }
}

pub use camera::{MainCamera, OrbitControls};
pub use models::{AssetLoad, LoadedAsset};
pub use scene::{PendingPageResizes, SceneObject, ViewerContext};
