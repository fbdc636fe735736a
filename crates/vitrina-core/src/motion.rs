//! Idle bob and sway applied to the framed model

use serde::{Deserialize, Serialize};

/// Periodic motion parameters. Stateless apart from the clock that feeds `sample`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleMotion {
    /// Peak vertical offset in world units
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    /// Angular rate of the bob (radians per second)
    #[serde(default = "default_bob_rate")]
    pub bob_rate: f32,
    /// Peak yaw in radians
    #[serde(default = "default_sway_amplitude")]
    pub sway_amplitude: f32,
    /// Angular rate of the sway (radians per second)
    #[serde(default = "default_sway_rate")]
    pub sway_rate: f32,
}

fn default_bob_amplitude() -> f32 {
    0.1
}

fn default_bob_rate() -> f32 {
    2.0
}

fn default_sway_amplitude() -> f32 {
    0.35
}

fn default_sway_rate() -> f32 {
    1.0
}

impl Default for IdleMotion {
    fn default() -> Self {
        Self {
            bob_amplitude: default_bob_amplitude(),
            bob_rate: default_bob_rate(),
            sway_amplitude: default_sway_amplitude(),
            sway_rate: default_sway_rate(),
        }
    }
}

/// Offsets for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Vertical offset (translation.y)
    pub lift: f32,
    /// Rotation about the vertical axis
    pub yaw: f32,
}

impl IdleMotion {
    /// Offsets at `t` seconds after the motion epoch
    pub fn sample(&self, t: f32) -> MotionSample {
        MotionSample {
            lift: (t * self.bob_rate).sin() * self.bob_amplitude,
            yaw: (t * self.sway_rate).sin() * self.sway_amplitude,
        }
    }

    /// Period of the vertical bob in seconds
    pub fn bob_period(&self) -> f32 {
        std::f32::consts::TAU / self.bob_rate
    }

    /// Period of the sway in seconds
    pub fn sway_period(&self) -> f32 {
        std::f32::consts::TAU / self.sway_rate
    }
}
