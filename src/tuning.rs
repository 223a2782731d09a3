//! Data-driven physics tuning
//!
//! Every knob of the ball simulation lives here so feel can be adjusted from a
//! JSON file without recompiling. Missing fields fall back to `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics and timing parameters for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity retention per tick (rolling friction)
    pub damping: f32,
    /// Lateral self-reinforcement per tick (hook from spin)
    pub curve_gain: f32,
    /// Lane half-width; the ball is clamped to ±this
    pub lane_half_width: f32,
    /// Lateral velocity multiplier on a gutter wall hit
    pub gutter_bounce: f32,
    /// Ball-to-pin distance that knocks a pin
    pub pin_hit_radius: f32,
    /// Ball deflection per knocked pin, lateral axis
    pub deflect_lateral: f32,
    /// Ball deflection per knocked pin, forward axis
    pub deflect_forward: f32,
    /// Forward position that ends the roll
    pub pin_deck_end: f32,
    /// Horizontal speed below which the roll ends
    pub min_roll_speed: f32,
    /// Seconds between the stop condition and roll finalization
    pub stop_delay: f32,
    /// Lateral launch speed at full spin
    pub spin_speed: f32,
    /// Extra forward launch speed at full power
    pub power_speed: f32,
    /// Forward launch speed at zero power
    pub base_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            damping: ROLL_DAMPING,
            curve_gain: CURVE_GAIN,
            lane_half_width: LANE_HALF_WIDTH,
            gutter_bounce: GUTTER_BOUNCE,
            pin_hit_radius: PIN_HIT_RADIUS,
            deflect_lateral: DEFLECT_LATERAL,
            deflect_forward: DEFLECT_FORWARD,
            pin_deck_end: PIN_DECK_END,
            min_roll_speed: MIN_ROLL_SPEED,
            stop_delay: STOP_DELAY,
            spin_speed: SPIN_SPEED,
            power_speed: POWER_SPEED,
            base_speed: BASE_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Fields not present keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Serialize to pretty JSON (for dumping a starting point to edit)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Correct values that would break the simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        // Retention above 1 would make speed grow forever
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            log::warn!("tuning: damping {} out of (0, 1], using {}", self.damping, defaults.damping);
            self.damping = defaults.damping;
        }
        if !self.curve_gain.is_finite() || self.curve_gain < 0.0 {
            log::warn!("tuning: curve_gain {} invalid, using {}", self.curve_gain, defaults.curve_gain);
            self.curve_gain = defaults.curve_gain;
        }
        // The ball must lose speed every tick or a roll can outlive the lane
        if self.damping * (1.0 + self.curve_gain) >= 1.0 {
            log::warn!(
                "tuning: damping {} with curve_gain {} never slows the ball, using defaults",
                self.damping,
                self.curve_gain
            );
            self.damping = defaults.damping;
            self.curve_gain = defaults.curve_gain;
        }
        if !(self.lane_half_width > 0.0 && self.lane_half_width.is_finite()) {
            log::warn!(
                "tuning: lane_half_width {} invalid, using {}",
                self.lane_half_width,
                defaults.lane_half_width
            );
            self.lane_half_width = defaults.lane_half_width;
        }
        if !(self.gutter_bounce <= 0.0 && self.gutter_bounce >= -1.0) {
            log::warn!(
                "tuning: gutter_bounce {} out of [-1, 0], using {}",
                self.gutter_bounce,
                defaults.gutter_bounce
            );
            self.gutter_bounce = defaults.gutter_bounce;
        }
        if !(self.pin_hit_radius > 0.0 && self.pin_hit_radius.is_finite()) {
            log::warn!(
                "tuning: pin_hit_radius {} invalid, using {}",
                self.pin_hit_radius,
                defaults.pin_hit_radius
            );
            self.pin_hit_radius = defaults.pin_hit_radius;
        }
        if !(self.stop_delay >= 0.0 && self.stop_delay.is_finite()) {
            log::warn!("tuning: stop_delay {} invalid, using {}", self.stop_delay, defaults.stop_delay);
            self.stop_delay = defaults.stop_delay;
        }
        // A zero threshold never trips on a ball that decays toward rest
        if !(self.min_roll_speed > 0.0 && self.min_roll_speed.is_finite()) {
            log::warn!(
                "tuning: min_roll_speed {} invalid, using {}",
                self.min_roll_speed,
                defaults.min_roll_speed
            );
            self.min_roll_speed = defaults.min_roll_speed;
        }
        if !self.pin_deck_end.is_finite() {
            log::warn!(
                "tuning: pin_deck_end {} invalid, using {}",
                self.pin_deck_end,
                defaults.pin_deck_end
            );
            self.pin_deck_end = defaults.pin_deck_end;
        }
        // Pin kicks stay bounded so the ball still comes to rest
        if !(self.deflect_lateral >= 0.0 && self.deflect_lateral.is_finite()) {
            log::warn!(
                "tuning: deflect_lateral {} invalid, using {}",
                self.deflect_lateral,
                defaults.deflect_lateral
            );
            self.deflect_lateral = defaults.deflect_lateral;
        }
        if !(self.deflect_forward >= 0.0 && self.deflect_forward <= 1.0) {
            log::warn!(
                "tuning: deflect_forward {} out of [0, 1], using {}",
                self.deflect_forward,
                defaults.deflect_forward
            );
            self.deflect_forward = defaults.deflect_forward;
        }
        if !(self.spin_speed >= 0.0 && self.spin_speed.is_finite()) {
            log::warn!("tuning: spin_speed {} invalid, using {}", self.spin_speed, defaults.spin_speed);
            self.spin_speed = defaults.spin_speed;
        }
        // Throws must always head toward the pins
        if !(self.base_speed > 0.0
            && self.base_speed.is_finite()
            && self.power_speed >= 0.0
            && self.power_speed.is_finite())
        {
            log::warn!("tuning: launch speeds must be positive, using defaults");
            self.base_speed = defaults.base_speed;
            self.power_speed = defaults.power_speed;
        }

        self
    }
}
