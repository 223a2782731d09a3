//! Neon Bowling - A single-lane arcade bowling game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, pin knocks, scoring, session control)
//! - `input`: Drag gesture to throw conversion
//! - `tuning`: Data-driven physics tuning

pub mod input;
pub mod sim;
pub mod tuning;

pub use input::{DragGesture, ThrowCommand};
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz, one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of pins in a rack
    pub const PIN_COUNT: usize = 10;
    /// Frames in a game
    pub const FRAME_COUNT: usize = 10;

    /// Lane dimensions (x = lateral, z = forward, negative z toward the pins)
    pub const LANE_HALF_WIDTH: f32 = 2.2;
    /// Forward position past which the ball has left the pin deck
    pub const PIN_DECK_END: f32 = -28.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.5;
    pub const BALL_START: Vec3 = Vec3::new(0.0, 0.5, 5.0);

    /// Throw conversion: lateral = spin * SPIN_SPEED, forward = -(power * POWER_SPEED + BASE_SPEED)
    pub const SPIN_SPEED: f32 = 8.0;
    pub const POWER_SPEED: f32 = 30.0;
    pub const BASE_SPEED: f32 = 15.0;

    /// Per-tick velocity retention (rolling friction)
    pub const ROLL_DAMPING: f32 = 0.995;
    /// Per-tick lateral self-reinforcement (hook)
    pub const CURVE_GAIN: f32 = 0.001;
    /// Lateral velocity multiplier when the ball hits a gutter wall
    pub const GUTTER_BOUNCE: f32 = -0.3;

    /// Ball center to pin center distance that knocks a pin
    pub const PIN_HIT_RADIUS: f32 = 0.8;
    /// Deflection applied to the ball per knocked pin (lateral, forward)
    pub const DEFLECT_LATERAL: f32 = 0.5;
    pub const DEFLECT_FORWARD: f32 = 0.2;

    /// Below this horizontal speed the ball counts as stopped
    pub const MIN_ROLL_SPEED: f32 = 0.5;
    /// Delay between the stop condition and the roll being finalized (seconds)
    pub const STOP_DELAY: f32 = 1.0;

    /// Drag gestures shorter than this (pixels) are ignored
    pub const MIN_DRAG_PX: f32 = 30.0;
    /// Drag length (pixels) that maps to full power
    pub const FULL_POWER_DRAG_PX: f32 = 200.0;
}

/// Lane-plane (x, z) components of a 3D vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Horizontal speed of a velocity (ignores the vertical axis)
#[inline]
pub fn horizontal_speed(vel: Vec3) -> f32 {
    horizontal(vel).length()
}
