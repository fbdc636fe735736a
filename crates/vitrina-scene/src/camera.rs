//! Orbit camera controls
//!
//! Left drag rotates, right drag pans, the wheel zooms. One finger rotates and
//! a pinch zooms on touch screens.
//!
//! Input is integrated in `First`, so the pointer movement of a frame reaches
//! the camera after that frame's animation and render.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use vitrina_core::{OrbitState, ViewerConfig};

use crate::scene::ViewerContext;

/// Scroll distance that counts as one wheel notch
const PIXELS_PER_LINE: f32 = 100.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit state plus pointer response
#[derive(Debug, Clone, Resource)]
pub struct OrbitControls {
    pub state: OrbitState,
    pub rotate_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_speed: f32,
    pub enabled: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        let config = ViewerConfig::default();
        Self::from_config(
            &config,
            Vec3::from_array(config.initial_eye),
            Vec3::from_array(config.initial_target),
        )
    }
}

impl OrbitControls {
    pub fn from_config(config: &ViewerConfig, eye: Vec3, target: Vec3) -> Self {
        Self {
            state: OrbitState::look_from(eye, target)
                .with_radius_limits(config.orbit.min_distance, config.orbit.max_distance),
            rotate_sensitivity: config.orbit.rotate_sensitivity,
            pan_sensitivity: config.orbit.pan_sensitivity,
            zoom_speed: config.orbit.zoom_speed,
            enabled: true,
        }
    }

    /// Drag in pixels (x right, y down)
    pub fn drag_rotate(&mut self, delta: Vec2) {
        self.state
            .rotate(-delta.x * self.rotate_sensitivity, delta.y * self.rotate_sensitivity);
    }

    pub fn drag_pan(&mut self, delta: Vec2) {
        self.state
            .pan(delta.x * self.pan_sensitivity, delta.y * self.pan_sensitivity);
    }

    /// Positive notches move closer
    pub fn scroll_zoom(&mut self, notches: f32) {
        self.state.zoom((1.0 - self.zoom_speed).powf(notches));
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitControls>()
            .add_systems(First, integrate_orbit_controls);
    }
}

/// Fold last frame's pointer input into the orbit and place the camera
pub fn integrate_orbit_controls(
    mut controls: ResMut<OrbitControls>,
    mut context: ResMut<ViewerContext>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    touches: Res<Touches>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    if controls.enabled {
        let motion = mouse_motion.delta;
        if motion != Vec2::ZERO {
            if mouse_buttons.pressed(MouseButton::Left) {
                controls.drag_rotate(motion);
            } else if mouse_buttons.pressed(MouseButton::Right) {
                controls.drag_pan(motion);
            }
        }

        let notches = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
        };
        if notches != 0.0 {
            controls.scroll_zoom(notches);
        }

        let active: Vec<_> = touches.iter().collect();
        match active.as_slice() {
            [touch] => {
                let delta = touch.delta();
                if delta != Vec2::ZERO {
                    controls.drag_rotate(delta);
                }
            }
            [a, b] => {
                let current = a.position().distance(b.position());
                let previous = (a.position() - a.delta()).distance(b.position() - b.delta());
                if current > 0.0 && previous > 0.0 {
                    controls.state.zoom(previous / current);
                }
            }
            _ => {}
        }
    }

    let eye = controls.state.eye();
    let target = controls.state.target;
    for mut transform in &mut cameras {
        transform.translation = eye;
        transform.look_at(target, Vec3::Y);
    }
    context.viewport.eye = eye;
    context.viewport.target = target;
}
