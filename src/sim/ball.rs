//! Ball simulation step
//!
//! The ball's kinematics live in an explicit `BallSim` owned by the session
//! rather than being scattered across the presentation layer. One call to
//! [`BallSim::step`] advances the ball by one tick.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{ball_pin_collision, gutter_wall_collision, past_pin_deck, pin_deflection};
use super::state::{Pin, PinId};
use crate::consts::{BALL_RADIUS, BALL_START};
use crate::horizontal_speed;
use crate::tuning::Tuning;

/// What happened during one tick of ball motion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Pins hit this tick, in rack order
    pub knocked: Vec<PinId>,
    /// True only on the first tick the stop condition holds
    pub should_stop: bool,
    /// Ball bounced off a gutter wall this tick
    pub gutter_hit: bool,
}

/// Initial velocity for a throw (negative z rolls toward the pins)
pub fn launch_velocity(power: f32, spin: f32, tuning: &Tuning) -> Vec3 {
    Vec3::new(
        spin * tuning.spin_speed,
        0.0,
        -(power * tuning.power_speed + tuning.base_speed),
    )
}

/// Ball kinematics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSim {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated roll angles about x and z (cosmetic)
    pub rotation: Vec2,
    /// Stop condition already reported for this throw
    stop_latched: bool,
}

impl Default for BallSim {
    fn default() -> Self {
        Self::new()
    }
}

impl BallSim {
    pub fn new() -> Self {
        Self {
            position: BALL_START,
            velocity: Vec3::ZERO,
            rotation: Vec2::ZERO,
            stop_latched: false,
        }
    }

    /// Return to the start position at rest
    pub fn reset(&mut self) {
        self.position = BALL_START;
        self.velocity = Vec3::ZERO;
        self.stop_latched = false;
    }

    /// Set the throw velocity. Position is left where it is (the start spot).
    pub fn launch(&mut self, power: f32, spin: f32, tuning: &Tuning) {
        self.velocity = launch_velocity(power, spin, tuning);
        self.stop_latched = false;
    }

    /// Horizontal speed
    pub fn speed(&self) -> f32 {
        horizontal_speed(self.velocity)
    }

    pub fn stop_latched(&self) -> bool {
        self.stop_latched
    }

    /// Advance the ball by `dt` seconds against the given pins.
    ///
    /// Knocked pins are skipped. The caller is responsible for marking the
    /// reported pins knocked before the next step.
    pub fn step(&mut self, pins: &[Pin], dt: f32, tuning: &Tuning) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if !(dt > 0.0 && dt.is_finite()) {
            return outcome;
        }

        // Integrate on the lane plane; height stays put
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;

        // Rolling friction
        self.velocity.x *= tuning.damping;
        self.velocity.z *= tuning.damping;

        // Hook: lateral motion feeds itself
        self.velocity.x += self.velocity.x * tuning.curve_gain;

        let speed = self.speed();

        self.rotation.x -= self.velocity.z * dt / BALL_RADIUS;
        self.rotation.y += self.velocity.x * dt / BALL_RADIUS;

        let (x, vel_x, gutter_hit) = gutter_wall_collision(
            self.position.x,
            self.velocity.x,
            tuning.lane_half_width,
            tuning.gutter_bounce,
        );
        self.position.x = x;
        self.velocity.x = vel_x;
        outcome.gutter_hit = gutter_hit;

        for pin in pins.iter().filter(|p| !p.knocked) {
            if outcome.knocked.contains(&pin.id) {
                continue;
            }
            let hit = ball_pin_collision(self.position, pin.position, tuning.pin_hit_radius);
            if hit.hit {
                outcome.knocked.push(pin.id);
                self.velocity +=
                    pin_deflection(hit.direction, tuning.deflect_lateral, tuning.deflect_forward);
            }
        }

        let stopped = past_pin_deck(self.position, tuning.pin_deck_end) || speed < tuning.min_roll_speed;
        if stopped && !self.stop_latched {
            self.stop_latched = true;
            outcome.should_stop = true;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::rack;

    fn launched(power: f32, spin: f32) -> BallSim {
        let mut ball = BallSim::new();
        ball.launch(power, spin, &Tuning::default());
        ball
    }

    #[test]
    fn test_launch_velocity() {
        let v = launch_velocity(1.0, 0.5, &Tuning::default());
        assert_eq!(v, Vec3::new(4.0, 0.0, -45.0));

        let v = launch_velocity(0.2, -1.0, &Tuning::default());
        assert!((v.z - (-21.0)).abs() < 1e-5);
        assert_eq!(v.x, -8.0);
    }

    #[test]
    fn test_step_integrates_and_damps() {
        let mut ball = launched(1.0, 0.0);
        let out = ball.step(&[], SIM_DT, &Tuning::default());
        assert!(out.knocked.is_empty());
        assert!(!out.should_stop);
        assert!((ball.position.z - (5.0 - 45.0 * SIM_DT)).abs() < 1e-5);
        assert!((ball.velocity.z - (-45.0 * 0.995)).abs() < 1e-4);
        assert_eq!(ball.position.y, BALL_START.y);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut ball = launched(1.0, 0.3);
        let before = ball.clone();
        let out = ball.step(&rack(), 0.0, &Tuning::default());
        assert_eq!(out, StepOutcome::default());
        assert_eq!(ball, before);
    }

    #[test]
    fn test_gutter_bounce_same_tick() {
        let mut ball = launched(0.5, 0.0);
        ball.position.x = 2.19;
        ball.velocity.x = 6.0;
        let out = ball.step(&[], 0.1, &Tuning::default());
        assert!(out.gutter_hit);
        assert_eq!(ball.position.x, 2.2);
        let expected = 6.0 * 0.995 * 1.001 * -0.3;
        assert!((ball.velocity.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_straight_throw_knocks_head_pin() {
        let pins = rack();
        let mut ball = launched(1.0, 0.0);
        let mut knocked = Vec::new();
        for _ in 0..120 {
            let out = ball.step(&pins, SIM_DT, &Tuning::default());
            knocked.extend(out.knocked);
            if ball.position.z < -23.0 {
                break;
            }
        }
        assert!(knocked.contains(&10));
    }

    #[test]
    fn test_knocked_pins_are_skipped() {
        let mut pins = rack();
        for pin in &mut pins {
            pin.knocked = true;
        }
        let mut ball = launched(1.0, 0.0);
        ball.position = pins[9].position;
        let velocity_before = ball.velocity;
        let out = ball.step(&pins, 1e-4, &Tuning::default());
        assert!(out.knocked.is_empty());
        // Only damping touched the velocity, no deflection
        assert!((ball.velocity.z - velocity_before.z * 0.995).abs() < 1e-4);
    }

    #[test]
    fn test_stop_signals_once() {
        let mut ball = BallSim::new();
        ball.velocity = Vec3::new(0.0, 0.0, -0.1);
        let first = ball.step(&[], SIM_DT, &Tuning::default());
        assert!(first.should_stop);
        for _ in 0..10 {
            let out = ball.step(&[], SIM_DT, &Tuning::default());
            assert!(!out.should_stop);
        }
        assert!(ball.stop_latched());

        ball.reset();
        assert!(!ball.stop_latched());
        assert_eq!(ball.position, BALL_START);
    }

    #[test]
    fn test_stop_past_pin_deck_at_speed() {
        let mut ball = launched(1.0, 0.0);
        ball.position.z = -27.9;
        let out = ball.step(&[], SIM_DT, &Tuning::default());
        assert!(ball.speed() > 0.5);
        assert!(out.should_stop);
    }
}
