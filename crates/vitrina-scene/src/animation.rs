//! Idle bob and sway of the framed asset

use bevy::prelude::*;

use crate::models::{AwaitingFraming, LoadedAsset};
use crate::scene::ViewerContext;
use crate::ViewerSettings;

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_asset);
    }
}

/// Apply the motion sample for the current clock to the asset pivot
pub fn animate_asset(
    time: Res<Time>,
    context: Res<ViewerContext>,
    settings: Res<ViewerSettings>,
    mut pivots: Query<&mut Transform, (With<LoadedAsset>, Without<AwaitingFraming>)>,
) {
    if !context.phase.is_animating() {
        return;
    }

    let sample = settings.motion.sample(time.elapsed_secs() - context.motion_epoch);
    for mut transform in &mut pivots {
        transform.translation.y = sample.lift;
        transform.rotation = Quat::from_rotation_y(sample.yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;
    use vitrina_core::{Bounds, ViewerPhase};

    use crate::camera::OrbitControls;
    use crate::models::{place_asset, settle_asset};

    fn animation_world(phase: ViewerPhase) -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<ViewerSettings>();
        world.insert_resource(ViewerContext {
            phase,
            ..default()
        });
        world.insert_resource(Time::<()>::default());

        let pivot = world
            .spawn((
                LoadedAsset {
                    offset: Entity::PLACEHOLDER,
                    scene_root: Entity::PLACEHOLDER,
                },
                Transform::from_scale(Vec3::splat(0.5)),
            ))
            .id();
        (world, pivot)
    }

    #[test]
    fn test_pivot_bobs_and_sways() {
        let (mut world, pivot) = animation_world(ViewerPhase::Framed);
        world.resource_mut::<Time>().advance_by(Duration::from_millis(700));
        world.run_system_once(animate_asset).unwrap();

        let transform = world.get::<Transform>(pivot).unwrap();
        let t = 0.7f32;
        assert!((transform.translation.y - (t * 2.0).sin() * 0.1).abs() < 1e-5);
        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw - t.sin() * 0.35).abs() < 1e-5);
        // Scale and horizontal position belong to framing
        assert_eq!(transform.scale, Vec3::splat(0.5));
        assert_eq!(transform.translation.x, 0.0);
        assert_eq!(transform.translation.z, 0.0);
    }

    #[test]
    fn test_no_motion_before_framing() {
        let (mut world, pivot) = animation_world(ViewerPhase::AwaitingAsset);
        world.resource_mut::<Time>().advance_by(Duration::from_millis(700));
        world.run_system_once(animate_asset).unwrap();

        let transform = world.get::<Transform>(pivot).unwrap();
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_motion_starts_at_rest_when_framed() {
        let (mut world, pivot) = animation_world(ViewerPhase::AwaitingAsset);
        world.init_resource::<OrbitControls>();
        world.entity_mut(pivot).insert(AwaitingFraming);
        // A slow fetch: the asset is framed well after startup
        world.resource_mut::<Time>().advance_by(Duration::from_millis(1300));

        let raw = Bounds::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let (normalization, framing) = place_asset(&raw, 75f32.to_radians()).unwrap();
        world
            .run_system_once(
                move |mut commands: Commands,
                      mut context: ResMut<ViewerContext>,
                      mut controls: ResMut<OrbitControls>,
                      time: Res<Time>,
                      pivots: Query<&LoadedAsset>| {
                    let Ok(asset) = pivots.get(pivot) else {
                        return;
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
                },
            )
            .unwrap();
        world.run_system_once(animate_asset).unwrap();

        let transform = world.get::<Transform>(pivot).unwrap();
        assert_eq!(transform.translation.y, 0.0);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::splat(normalization.scale));
    }

    #[test]
    fn test_motion_measured_from_epoch() {
        let (mut world, pivot) = animation_world(ViewerPhase::Framed);
        world.resource_mut::<ViewerContext>().motion_epoch = 1.0;
        world.resource_mut::<Time>().advance_by(Duration::from_secs(1));
        world.run_system_once(animate_asset).unwrap();

        let transform = world.get::<Transform>(pivot).unwrap();
        assert!(transform.translation.y.abs() < 1e-6);
    }
}
