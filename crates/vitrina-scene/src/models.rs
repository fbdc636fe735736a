//! glTF asset loading, normalization and auto-framing
//!
//! The asset is spawned as three nested entities:
//!
//! ```text
//! LoadedAsset (pivot: uniform scale, bob, sway)
//! └── AssetOffset (translation = -center of the raw model)
//!     └── SceneRoot (the glTF scene)
//! ```
//!
//! so the model stays centered on the pivot while the animation moves the pivot.

use std::time::Duration;

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};

use vitrina_core::framing::{frame, normalize, DISTANCE_MARGIN};
use vitrina_core::{AssetLoadTask, Bounds, Framing, LoadError, LoadPoll, LoadStatus, Normalization};

use crate::camera::OrbitControls;
use crate::scene::{SceneObject, ViewerContext};

/// The outstanding asset request
#[derive(Resource)]
pub struct AssetLoad {
    pub handle: Handle<Gltf>,
    pub task: AssetLoadTask,
    /// Clock reading when the request was issued
    pub requested_at: Duration,
}

/// Pivot of the loaded asset
#[derive(Component, Debug)]
pub struct LoadedAsset {
    pub offset: Entity,
    pub scene_root: Entity,
}

/// Centering node between the pivot and the glTF scene
#[derive(Component)]
pub struct AssetOffset;

/// Present on the pivot until the asset has been measured and framed
#[derive(Component)]
pub struct AwaitingFraming;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, poll_asset_load)
            .add_systems(Update, frame_loaded_asset.after(poll_asset_load));
    }
}

/// Drive the load task with the asset server's state
fn poll_asset_load(
    mut commands: Commands,
    load: Option<ResMut<AssetLoad>>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    time: Res<Time>,
    mut context: ResMut<ViewerContext>,
) {
    let Some(mut load) = load else {
        return;
    };

    let status = match asset_server.get_load_state(load.handle.id()) {
        Some(LoadState::Loaded) => LoadStatus::Loaded,
        Some(LoadState::Failed(err)) => LoadStatus::Failed(err.to_string()),
        _ => LoadStatus::Pending,
    };
    let elapsed = time.elapsed().saturating_sub(load.requested_at);

    match load.task.poll(elapsed, status) {
        LoadPoll::Pending | LoadPoll::Settled => {}
        LoadPoll::Ready => {
            // Use the default scene, or the first one if none is marked
            let scene = gltf_assets
                .get(&load.handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));

            match scene {
                Some(scene) => {
                    let pivot = spawn_asset(&mut commands, scene);
                    context.asset_root = Some(pivot);
                    tracing::info!("Asset fetched: {}", load.task.path());
                }
                None => {
                    if let Some(error) = load.task.abort(LoadError::MissingScene) {
                        let path = load.task.path().to_string();
                        report_failure(&mut commands, &mut context, &path, error);
                    }
                }
            }
        }
        LoadPoll::Failed(error) => {
            let path = load.task.path().to_string();
            report_failure(&mut commands, &mut context, &path, error);
        }
    }
}

/// Spawn pivot → offset → scene, hidden until framed. Returns the pivot.
fn spawn_asset(commands: &mut Commands, scene: Handle<Scene>) -> Entity {
    let scene_root = commands.spawn(SceneRoot(scene)).id();
    let offset = commands
        .spawn((AssetOffset, Transform::default(), Visibility::Inherited))
        .add_child(scene_root)
        .id();

    commands
        .spawn((
            Name::new("LoadedAsset"),
            LoadedAsset { offset, scene_root },
            AwaitingFraming,
            SceneObject,
            Transform::default(),
            Visibility::Hidden,
        ))
        .add_child(offset)
        .id()
}

/// Log a load failure and drop anything the load had added to the scene.
/// Returns false if a failure was already reported.
pub fn report_failure(commands: &mut Commands, context: &mut ViewerContext, path: &str, error: LoadError) -> bool {
    if let Err(e) = context.phase.fail() {
        tracing::debug!("Ignoring late load error ({}): {}", e, error);
        return false;
    }

    tracing::error!("Failed to load asset {}: {}", path, error);
    if let Some(root) = context.asset_root.take() {
        commands.entity(root).despawn();
    }
    true
}

/// Once the glTF scene has been instantiated, center, scale and frame it.
/// The camera itself follows on the next orbit update.
#[allow(clippy::too_many_arguments)]
fn frame_loaded_asset(
    mut commands: Commands,
    load: Option<ResMut<AssetLoad>>,
    mut context: ResMut<ViewerContext>,
    mut controls: ResMut<OrbitControls>,
    scene_spawner: Res<SceneSpawner>,
    awaiting: Query<(Entity, &LoadedAsset), With<AwaitingFraming>>,
    instances: Query<&SceneInstance>,
    children_query: Query<&Children>,
    nodes: Query<(&Transform, Option<&Mesh3d>)>,
    meshes: Res<Assets<Mesh>>,
    time: Res<Time>,
) {
    let Some(mut load) = load else {
        return;
    };

    for (pivot, asset) in &awaiting {
        let Ok(instance) = instances.get(asset.scene_root) else {
            continue;
        };
        if !scene_spawner.instance_is_ready(**instance) {
            continue;
        }

        let raw = collect_bounds(asset.scene_root, Mat4::IDENTITY, &children_query, &nodes, &meshes);
        let placement = if raw.is_empty() {
            Err(LoadError::EmptyGeometry)
        } else {
            place_asset(&raw, context.viewport.fov_radians())
        };

        let (normalization, framing) = match placement {
            Ok(placement) => placement,
            Err(error) => {
                if let Some(error) = load.task.abort(error) {
                    let path = load.task.path().to_string();
                    report_failure(&mut commands, &mut context, &path, error);
                }
                continue;
            }
        };

        settle_asset(
            &mut commands,
            &mut context,
            &mut controls,
            pivot,
            asset,
            (&normalization, &framing),
            time.elapsed_secs(),
        );
        load.task.finish();

        tracing::info!(
            "Asset loaded: {} (max dimension {:.3}, scale {:.3}, camera distance {:.3})",
            load.task.path(),
            raw.max_dimension(),
            normalization.scale,
            framing.distance * DISTANCE_MARGIN
        );
    }
}

/// Put a measured asset in place and reveal it. The pivot takes the scale and
/// the offset node the centering, so the model center sits on the pivot. The
/// idle motion starts from `now`.
pub fn settle_asset(
    commands: &mut Commands,
    context: &mut ViewerContext,
    controls: &mut OrbitControls,
    pivot: Entity,
    asset: &LoadedAsset,
    (normalization, framing): (&Normalization, &Framing),
    now: f32,
) {
    commands
        .entity(asset.offset)
        .insert(Transform::from_translation(normalization.offset));
    commands
        .entity(pivot)
        .remove::<AwaitingFraming>()
        .insert((
            Transform::from_scale(Vec3::splat(normalization.scale)),
            Visibility::Inherited,
        ));

    context.viewport.reframe(framing);
    controls.state.retarget(framing.eye, framing.target);

    if let Err(e) = context.phase.frame() {
        tracing::warn!("Asset framed in unexpected state: {}", e);
    }
    context.motion_epoch = now;
}

/// Normalize a raw model box and frame the result
pub fn place_asset(raw: &Bounds, fov_radians: f32) -> Result<(Normalization, Framing), LoadError> {
    let normalization = normalize(raw)?;
    let scaled = raw.transformed(&normalization.matrix());
    Ok((normalization, frame(&scaled, fov_radians)))
}

/// Box of a mesh in its own space
pub fn mesh_bounds(mesh: &Mesh) -> Option<Bounds> {
    let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?.as_float3()?;
    let bounds = Bounds::from_points(positions.iter().map(|p| Vec3::from_array(*p)));
    (!bounds.is_empty()).then_some(bounds)
}

/// Recursively union the mesh boxes below `entity`, expressed in the space
/// `parent` maps into. Each mesh box is transformed corner by corner.
pub fn collect_bounds(
    entity: Entity,
    parent: Mat4,
    children_query: &Query<&Children>,
    nodes: &Query<(&Transform, Option<&Mesh3d>)>,
    meshes: &Assets<Mesh>,
) -> Bounds {
    let mut bounds = Bounds::EMPTY;

    let world = match nodes.get(entity) {
        Ok((transform, mesh)) => {
            let local = Mat4::from_scale_rotation_translation(transform.scale, transform.rotation, transform.translation);
            let world = parent * local;
            if let Some(mesh_bounds) = mesh.and_then(|m| meshes.get(&m.0)).and_then(mesh_bounds) {
                bounds = bounds.union(&mesh_bounds.transformed(&world));
            }
            world
        }
        Err(_) => parent,
    };

    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            bounds = bounds.union(&collect_bounds(child, world, children_query, nodes, meshes));
        }
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_place_asset_centers_and_scales() {
        let raw = Bounds::new(Vec3::new(-1.0, 0.0, -0.5), Vec3::new(1.0, 4.0, 0.5));
        let fov = 75f32.to_radians();
        let (normalization, framing) = place_asset(&raw, fov).unwrap();

        assert!(approx(normalization.scale, 1.5 / 4.0 * 1.5));
        assert_eq!(normalization.offset, Vec3::new(0.0, -2.0, 0.0));

        // Scaled model is 2.25 tall and centered, so the camera looks at the origin
        assert!(framing.target.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(approx(framing.distance, vitrina_core::framing::fit_distance(2.25, fov)));
        assert!(approx(framing.eye.y, 2.25 * 0.2));
    }

    #[test]
    fn test_place_asset_rejects_flat_point() {
        let raw = Bounds::new(Vec3::ONE, Vec3::ONE);
        assert!(matches!(place_asset(&raw, 1.0), Err(LoadError::Framing(_))));
    }

    #[test]
    fn test_collect_bounds_follows_hierarchy() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        let cube = world
            .resource_mut::<Assets<Mesh>>()
            .add(Mesh::from(Cuboid::new(2.0, 2.0, 2.0)));

        let root = world.spawn(Transform::default()).id();
        let node = world
            .spawn((Transform::from_xyz(0.0, 3.0, 0.0).with_scale(Vec3::splat(2.0)), ChildOf(root)))
            .id();
        world.spawn((Transform::from_xyz(1.0, 0.0, 0.0), Mesh3d(cube), ChildOf(node)));

        let bounds = world
            .run_system_once(
                move |children: Query<&Children>, nodes: Query<(&Transform, Option<&Mesh3d>)>, meshes: Res<Assets<Mesh>>| {
                    collect_bounds(root, Mat4::IDENTITY, &children, &nodes, &meshes)
                },
            )
            .unwrap();

        // Unit-half cube, shifted by 1 in x, then scaled by 2 and lifted by 3
        assert!(bounds.min.abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), 1e-5));
        assert!(bounds.max.abs_diff_eq(Vec3::new(4.0, 5.0, 2.0), 1e-5));
    }

    #[test]
    fn test_collect_bounds_without_meshes_is_empty() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        let root = world.spawn(Transform::default()).id();
        world.spawn((Transform::from_xyz(5.0, 0.0, 0.0), ChildOf(root)));

        let bounds = world
            .run_system_once(
                move |children: Query<&Children>, nodes: Query<(&Transform, Option<&Mesh3d>)>, meshes: Res<Assets<Mesh>>| {
                    collect_bounds(root, Mat4::IDENTITY, &children, &nodes, &meshes)
                },
            )
            .unwrap();
        assert!(bounds.is_empty());
    }

    /// Pivot → offset → scene root, with one off-center mesh under the scene
    fn spawned_asset(world: &mut World) -> (Entity, LoadedAsset) {
        world.init_resource::<Assets<Mesh>>();
        let slab = world
            .resource_mut::<Assets<Mesh>>()
            .add(Mesh::from(Cuboid::new(1.0, 4.0, 2.0)));

        let scene_root = world.spawn(Transform::default()).id();
        world.spawn((Transform::from_xyz(3.0, 1.0, -2.0), Mesh3d(slab), ChildOf(scene_root)));
        let offset = world
            .spawn((AssetOffset, Transform::default()))
            .add_child(scene_root)
            .id();
        let asset = LoadedAsset { offset, scene_root };
        let pivot = world
            .spawn((
                LoadedAsset { offset, scene_root },
                AwaitingFraming,
                Transform::default(),
                Visibility::Hidden,
            ))
            .add_child(offset)
            .id();
        (pivot, asset)
    }

    fn bounds_below(world: &mut World, entity: Entity) -> Bounds {
        world
            .run_system_once(
                move |children: Query<&Children>, nodes: Query<(&Transform, Option<&Mesh3d>)>, meshes: Res<Assets<Mesh>>| {
                    collect_bounds(entity, Mat4::IDENTITY, &children, &nodes, &meshes)
                },
            )
            .unwrap()
    }

    #[test]
    fn test_settled_asset_is_centered_on_pivot() {
        let mut world = World::new();
        world.init_resource::<ViewerContext>();
        world.init_resource::<OrbitControls>();
        world.resource_mut::<ViewerContext>().phase.begin_loading().unwrap();
        let (pivot, asset) = spawned_asset(&mut world);

        let raw = bounds_below(&mut world, asset.scene_root);
        assert!(raw.center().abs_diff_eq(Vec3::new(3.0, 1.0, -2.0), 1e-5));
        let fov = 75f32.to_radians();
        let (normalization, framing) = place_asset(&raw, fov).unwrap();

        world
            .run_system_once(
                move |mut commands: Commands, mut context: ResMut<ViewerContext>, mut controls: ResMut<OrbitControls>| {
                    settle_asset(
                        &mut commands,
                        &mut context,
                        &mut controls,
                        pivot,
                        &asset,
                        (&normalization, &framing),
                        2.5,
                    );
                },
            )
            .unwrap();

        // Composed from the pivot down, the model is centered and 2.25 at its largest
        let placed = bounds_below(&mut world, pivot);
        assert!(placed.center().abs_diff_eq(Vec3::ZERO, 1e-4));
        assert!(approx(placed.max_dimension(), 2.25));

        assert!(world.get::<AwaitingFraming>(pivot).is_none());
        assert_eq!(world.get::<Visibility>(pivot), Some(&Visibility::Inherited));

        let context = world.resource::<ViewerContext>();
        assert_eq!(context.phase, vitrina_core::ViewerPhase::Framed);
        assert_eq!(context.motion_epoch, 2.5);
        assert_eq!(context.viewport.eye, framing.eye);
        assert!(approx(world.resource::<OrbitControls>().state.radius, framing.eye.distance(framing.target)));
    }

    #[test]
    fn test_failed_fetch_is_reported_once_by_polling() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_resource::<ViewerContext>()
            .add_systems(Update, poll_asset_load);
        app.world_mut().resource_mut::<ViewerContext>().phase.begin_loading().unwrap();
        app.world_mut().spawn(SceneObject);
        app.world_mut().spawn(SceneObject);

        // No loader is registered for glTF, so the fetch fails
        let handle = app.world().resource::<AssetServer>().load::<Gltf>("missing/chibi_cute.glb");
        app.insert_resource(AssetLoad {
            handle,
            task: AssetLoadTask::new("/missing/chibi_cute.glb", None),
            requested_at: Duration::ZERO,
        });

        for _ in 0..200 {
            app.update();
            if app.world().resource::<ViewerContext>().phase.is_terminal() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(app.world().resource::<ViewerContext>().phase, vitrina_core::ViewerPhase::LoadFailed);
        assert!(app.world().resource::<AssetLoad>().task.is_finished());

        // Later polls are settled and leave the scene alone
        app.update();
        app.update();
        assert_eq!(app.world().resource::<ViewerContext>().phase, vitrina_core::ViewerPhase::LoadFailed);
        assert!(app.world().resource::<ViewerContext>().asset_root.is_none());
        assert_eq!(scene_object_count(app.world_mut()), 2);
    }

    fn failure_world() -> World {
        let mut world = World::new();
        world.init_resource::<ViewerContext>();
        world.resource_mut::<ViewerContext>().phase.begin_loading().unwrap();
        world.spawn(SceneObject);
        world.spawn(SceneObject);
        world.spawn(SceneObject);
        world
    }

    fn scene_object_count(world: &mut World) -> usize {
        world.query::<&SceneObject>().iter(world).count()
    }

    #[test]
    fn test_failure_before_spawn_leaves_scene_untouched() {
        let mut world = failure_world();

        let reported = world
            .run_system_once(|mut commands: Commands, mut context: ResMut<ViewerContext>| {
                let first = report_failure(&mut commands, &mut context, "/chibi_cute.glb", LoadError::Fetch("404".to_string()));
                let second = report_failure(&mut commands, &mut context, "/chibi_cute.glb", LoadError::Cancelled);
                (first, second)
            })
            .unwrap();

        assert_eq!(reported, (true, false));
        assert_eq!(scene_object_count(&mut world), 3);
        assert_eq!(world.resource::<ViewerContext>().phase, vitrina_core::ViewerPhase::LoadFailed);
    }

    #[test]
    fn test_failure_after_spawn_removes_partial_asset() {
        let mut world = failure_world();
        let pivot = world.spawn((SceneObject, Transform::default())).id();
        world.spawn((Transform::default(), ChildOf(pivot)));
        world.resource_mut::<ViewerContext>().asset_root = Some(pivot);

        world
            .run_system_once(|mut commands: Commands, mut context: ResMut<ViewerContext>| {
                report_failure(&mut commands, &mut context, "/empty.glb", LoadError::EmptyGeometry)
            })
            .unwrap();

        assert_eq!(scene_object_count(&mut world), 3);
        assert!(world.get_entity(pivot).is_err());
        assert!(world.resource::<ViewerContext>().asset_root.is_none());
    }
}
