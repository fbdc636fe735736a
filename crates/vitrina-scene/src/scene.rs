//! Scene setup - camera, lights, asset request, resize policy and teardown

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use vitrina_core::{AssetLoadTask, LightConfig, ViewerPhase, ViewportState};
use vitrina_core::load::normalize_asset_path;

use crate::camera::{MainCamera, OrbitControls};
use crate::models::AssetLoad;
use crate::ViewerSettings;

/// Ambient brightness (cd/m²) for an ambient light of intensity 1.0
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 400.0;

/// Illuminance (lux) for a directional light of intensity 1.0
pub const DIRECTIONAL_LUX_PER_UNIT: f32 = 5000.0;

/// Marker for every entity the viewer owns
#[derive(Component)]
pub struct SceneObject;

/// Marker for the key light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Handles and lifecycle state of the viewer
#[derive(Debug, Resource, Default)]
pub struct ViewerContext {
    pub camera: Option<Entity>,
    pub directional_light: Option<Entity>,
    /// Pivot entity of the loaded asset, once spawned
    pub asset_root: Option<Entity>,
    pub phase: ViewerPhase,
    pub viewport: ViewportState,
    /// Clock reading (seconds) the idle motion is measured from
    pub motion_epoch: f32,
}

/// Page resizes queued by browser callbacks, as reported window sizes.
///
/// The canvas keeps a fixed size on the page, so winit never reports these.
#[derive(Resource, Default, Clone)]
pub struct PendingPageResizes(pub Arc<Mutex<Vec<Vec2>>>);

impl PendingPageResizes {
    pub fn push(&self, width: f32, height: f32) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(Vec2::new(width, height));
        }
    }

    fn drain(&self) -> Vec<Vec2> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerContext>()
            .init_resource::<PendingPageResizes>()
            .add_systems(Startup, (bootstrap_scene, request_asset).chain())
            .add_systems(Update, handle_resize)
            .add_systems(Last, teardown_viewer);
    }
}

fn light_color(light: &LightConfig) -> Color {
    let [r, g, b] = light.color;
    Color::linear_rgb(r, g, b)
}

/// Spawn the camera and lights and reset the viewer context
pub fn bootstrap_scene(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    mut context: ResMut<ViewerContext>,
    mut controls: ResMut<OrbitControls>,
) {
    let viewport = ViewportState::from_config(&settings);

    // Ambient light rides on the camera so it goes away with it
    let camera = commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: viewport.fov_radians(),
                aspect_ratio: viewport.aspect,
                near: viewport.near,
                far: viewport.far,
                ..default()
            }),
            Transform::from_translation(viewport.eye).looking_at(viewport.target, Vec3::Y),
            AmbientLight {
                color: light_color(&settings.ambient_light),
                brightness: settings.ambient_light.intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
                ..default()
            },
            MainCamera,
            SceneObject,
        ))
        .id();

    let light_position = settings
        .directional_light
        .position
        .map(Vec3::from_array)
        .unwrap_or(Vec3::Y);
    let directional_light = commands
        .spawn((
            DirectionalLight {
                color: light_color(&settings.directional_light),
                illuminance: settings.directional_light.intensity * DIRECTIONAL_LUX_PER_UNIT,
                ..default()
            },
            Transform::from_translation(light_position).looking_at(Vec3::ZERO, Vec3::Y),
            MainDirectionalLight,
            SceneObject,
        ))
        .id();

    *controls = OrbitControls::from_config(&settings, viewport.eye, viewport.target);

    *context = ViewerContext {
        camera: Some(camera),
        directional_light: Some(directional_light),
        asset_root: None,
        phase: ViewerPhase::Uninitialized,
        viewport,
        motion_epoch: 0.0,
    };

    tracing::debug!(
        "Viewer ready: fov {}°, aspect {:.2}, camera at {:?}",
        context.viewport.fov_degrees,
        context.viewport.aspect,
        context.viewport.eye
    );
}

/// Issue the one asset request
pub fn request_asset(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
    mut context: ResMut<ViewerContext>,
    time: Res<Time>,
) {
    if let Err(e) = context.phase.begin_loading() {
        tracing::warn!("Asset already requested: {}", e);
        return;
    }

    let path = normalize_asset_path(&settings.asset_path);
    tracing::info!("Loading asset: {}", path);

    commands.insert_resource(AssetLoad {
        handle: asset_server.load(path),
        task: AssetLoadTask::new(settings.asset_path.clone(), settings.load_timeout()),
        requested_at: time.elapsed(),
    });
}

/// Every resize, from winit or from the page, forces the surface back to the
/// fixed target size, whatever size was reported
pub fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    page_resizes: Res<PendingPageResizes>,
    mut context: ResMut<ViewerContext>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    let mut forced = None;
    for event in resized.read() {
        forced = Some(context.viewport.apply_resize(event.width, event.height));
    }
    for size in page_resizes.drain() {
        forced = Some(context.viewport.apply_resize(size.x, size.y));
    }
    let Some(size) = forced else {
        return;
    };

    for mut projection in &mut projections {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = context.viewport.aspect;
        }
    }

    let (width, height) = (size.width as f32, size.height as f32);
    if let Ok(mut window) = windows.single_mut() {
        // Only touch the window when it differs, or the forced size would
        // trigger another resize every frame
        if window.resolution.width() != width || window.resolution.height() != height {
            window.resolution.set(width, height);
            tracing::debug!("Surface forced to {}x{}", size.width, size.height);
        }
    }
}

/// Cancel outstanding work and despawn everything the viewer created
pub fn teardown_viewer(
    mut exits: MessageReader<AppExit>,
    mut commands: Commands,
    objects: Query<Entity, With<SceneObject>>,
    load: Option<Res<AssetLoad>>,
    mut context: ResMut<ViewerContext>,
) {
    if exits.read().next().is_none() {
        return;
    }

    if let Some(load) = load {
        load.task.cancel();
    }
    commands.remove_resource::<AssetLoad>();

    let mut count = 0;
    for entity in &objects {
        commands.entity(entity).despawn();
        count += 1;
    }

    context.camera = None;
    context.directional_light = None;
    context.asset_root = None;
    tracing::info!("Viewer torn down ({} scene objects)", count);
}
