//! Collision detection and response
//!
//! Ball/pin contacts are point-distance checks in 3D; the gutters are two
//! walls on the lateral axis. Neither is a rigid-body solve.

use glam::Vec3;

/// Result of a ball/pin contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit vector from ball center toward the pin
    pub direction: Vec3,
    /// Center distance at the time of the check
    pub distance: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            direction: Vec3::ZERO,
            distance: f32::INFINITY,
        }
    }
}

/// Check whether the ball is close enough to a pin to knock it
pub fn ball_pin_collision(ball_pos: Vec3, pin_pos: Vec3, hit_radius: f32) -> CollisionResult {
    let offset = pin_pos - ball_pos;
    let distance = offset.length();

    if distance < hit_radius {
        CollisionResult {
            hit: true,
            direction: offset.normalize_or_zero(),
            distance,
        }
    } else {
        CollisionResult::miss()
    }
}

/// Velocity change for the ball after knocking a pin.
///
/// The ball is pushed away from the pin, more on the lateral axis than the
/// forward one so a pin hit steers the ball without stalling it.
#[inline]
pub fn pin_deflection(direction: Vec3, lateral: f32, forward: f32) -> Vec3 {
    Vec3::new(-direction.x * lateral, 0.0, -direction.z * forward)
}

/// Clamp the ball between the gutter walls.
///
/// Returns the corrected (position, velocity) on the lateral axis and whether
/// a wall was hit this tick.
pub fn gutter_wall_collision(x: f32, vel_x: f32, half_width: f32, bounce: f32) -> (f32, f32, bool) {
    if x < -half_width {
        (-half_width, vel_x * bounce, true)
    } else if x > half_width {
        (half_width, vel_x * bounce, true)
    } else {
        (x, vel_x, false)
    }
}

/// Check if the ball has rolled past the end of the pin deck
#[inline]
pub fn past_pin_deck(ball_pos: Vec3, deck_end: f32) -> bool {
    ball_pos.z < deck_end
}
