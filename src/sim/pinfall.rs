//! Knocked pin fall animation
//!
//! Purely visual: a knocked pin tips over in a random heading and sinks a
//! little. Gameplay only ever looks at `Pin::knocked`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Tilt beyond which a pin is drawn lying down
pub const DOWN_TILT: f32 = std::f32::consts::PI / 2.5;
/// Lowest the pin sinks below its rest height
const MAX_DROP: f32 = -0.3;
/// Sink rate (units per second)
const DROP_RATE: f32 = 2.0;

/// Fall pose of a single pin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PinFall {
    /// Tilt about the x and z axes (radians)
    pub tilt: Vec2,
    /// Tilt rate (radians per second)
    pub tilt_vel: Vec2,
    /// Vertical offset from rest height
    pub drop: f32,
}

impl PinFall {
    /// Start falling in a random heading
    pub fn knock<R: Rng>(rng: &mut R) -> Self {
        let angle = rng.random_range(0.0..TAU);
        let speed_x = rng.random_range(2.0..5.0);
        let speed_z = rng.random_range(2.0..5.0);
        Self {
            tilt: Vec2::ZERO,
            tilt_vel: Vec2::new(angle.cos() * speed_x, angle.sin() * speed_z),
            drop: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.tilt = (self.tilt + self.tilt_vel * dt).min(Vec2::splat(FRAC_PI_2));
        self.drop = (self.drop - dt * DROP_RATE).max(MAX_DROP);
    }

    /// Whether the pin has tipped far enough to be drawn lying down
    pub fn is_down(&self) -> bool {
        self.tilt.x.abs() > DOWN_TILT
    }
}
