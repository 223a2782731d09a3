//! Game session controller
//!
//! `Session` exclusively owns the authoritative game state and is the only
//! thing that mutates it. Commands that arrive in the wrong phase are no-ops.
//! The presentation layer reads a [`SessionSnapshot`] after each tick.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::BallSim;
use super::pinfall::PinFall;
use super::scoring::Scorecard;
use super::state::{Frame, GameEvent, Pin, PinId, RngState, SessionPhase, rack};
use super::timer::StopTimer;
use crate::tuning::Tuning;

/// Read-only projection of the session for rendering and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub pins: Vec<Pin>,
    pub ball: BallSim,
    pub phase: SessionPhase,
    pub rolling: bool,
    pub resetting: bool,
    pub current_frame: usize,
    pub current_roll: u8,
    pub frames: Vec<Frame>,
    pub total_score: u32,
    pub knocked_this_roll: u8,
    pub pins_standing: usize,
    /// Seconds until the current roll is finalized, once the ball has stopped
    pub stop_pending: Option<f32>,
}

impl SessionSnapshot {
    /// Knocked pins on the deck right now (not just this roll)
    pub fn pins_down(&self) -> usize {
        self.pins.len() - self.pins_standing
    }
}

/// A single-player, single-lane session
#[derive(Debug, Clone)]
pub struct Session {
    pins: Vec<Pin>,
    ball: BallSim,
    scorecard: Scorecard,
    knocked_this_roll: u8,
    phase: SessionPhase,
    /// Debounce for the current throw; None while not rolling
    stop_timer: Option<StopTimer>,
    /// Accepted throws so far (keys the stop timer)
    throws: u32,
    tuning: Tuning,
    rng_state: RngState,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Simulation tick counter
    time_ticks: u64,
}

impl Session {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        log::info!("New bowling session (seed {})", seed);
        Self {
            pins: rack(),
            ball: BallSim::new(),
            scorecard: Scorecard::new(),
            knocked_this_roll: 0,
            phase: SessionPhase::Idle,
            stop_timer: None,
            throws: 0,
            tuning: tuning.sanitized(),
            rng: rng_state.to_rng(),
            rng_state,
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_rolling(&self) -> bool {
        self.phase == SessionPhase::Rolling
    }

    pub fn is_resetting(&self) -> bool {
        self.phase == SessionPhase::Resetting
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn ball(&self) -> &BallSim {
        &self.ball
    }

    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    pub fn knocked_this_roll(&self) -> u8 {
        self.knocked_this_roll
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn stop_timer(&self) -> Option<&StopTimer> {
        self.stop_timer.as_ref()
    }

    pub fn pins_standing(&self) -> usize {
        self.pins.iter().filter(|p| !p.knocked).count()
    }

    /// Start a throw. Returns false (and changes nothing) unless idle.
    pub fn throw_ball(&mut self, power: f32, spin: f32) -> bool {
        if self.phase != SessionPhase::Idle {
            log::debug!("throw ignored: session is {:?}", self.phase);
            return false;
        }
        if !(power.is_finite() && power > 0.0) {
            log::debug!("throw ignored: power {} out of range", power);
            return false;
        }
        let power = power.min(1.0);
        let spin = if spin.is_finite() { spin.clamp(-1.0, 1.0) } else { 0.0 };

        self.ball.reset();
        self.ball.launch(power, spin, &self.tuning);
        self.knocked_this_roll = 0;
        self.throws += 1;
        self.stop_timer = Some(StopTimer::new(self.throws));
        self.phase = SessionPhase::Rolling;
        self.events.push(GameEvent::Thrown { power, spin });

        log::info!(
            "Throw {} (frame {}, roll {}): power {:.2}, spin {:.2}",
            self.throws,
            self.scorecard.current_frame() + 1,
            self.scorecard.current_roll() + 1,
            power,
            spin
        );
        true
    }

    /// Mark a pin knocked. Idempotent; ignored unless rolling.
    pub fn knock_pin(&mut self, id: PinId) {
        if self.phase != SessionPhase::Rolling {
            log::debug!("knock of pin {} ignored: session is {:?}", id, self.phase);
            return;
        }
        let Some(pin) = self.pins.iter_mut().find(|p| p.id == id) else {
            log::debug!("knock of unknown pin {} ignored", id);
            return;
        };
        if pin.knocked {
            return;
        }

        pin.knocked = true;
        pin.fall = PinFall::knock(&mut self.rng);
        self.knocked_this_roll += 1;
        self.events.push(GameEvent::PinKnocked { id });
    }

    /// Finalize the current roll. Normally invoked by the stop timer.
    pub fn on_ball_stop(&mut self) {
        if self.phase != SessionPhase::Rolling {
            log::debug!("ball stop ignored: session is {:?}", self.phase);
            return;
        }
        if let Some(mut timer) = self.stop_timer.take() {
            timer.cancel();
            log::debug!("stop timer for throw {} retired", timer.throw_id());
        }

        let result = self.scorecard.record_roll(self.knocked_this_roll);
        self.events.push(GameEvent::RollFinalized {
            frame: result.frame,
            roll: result.roll,
            knocked: result.knocked,
            mark: result.mark,
        });
        if result.frame_complete {
            self.events.push(GameEvent::FrameAdvanced {
                frame: self.scorecard.current_frame(),
            });
        }

        self.ball.reset();
        self.phase = SessionPhase::Idle;

        log::info!(
            "Roll finalized: {} pins ({:?}), total {}",
            result.knocked,
            result.mark,
            self.scorecard.total()
        );
    }

    /// Reset pins and ball. Rejected while rolling or already resetting.
    ///
    /// A full rack is set when every pin is down or a new frame is starting;
    /// otherwise only the ball returns and standing pins stay as they are.
    pub fn reset_pins(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            log::debug!("reset ignored: session is {:?}", self.phase);
            return false;
        }

        let all_knocked = self.pins.iter().all(|p| p.knocked);
        let full = all_knocked || self.scorecard.current_roll() == 0;

        if full {
            for pin in &mut self.pins {
                pin.restand();
            }
        }
        self.ball.reset();
        self.knocked_this_roll = 0;
        self.phase = SessionPhase::Resetting;
        self.events.push(GameEvent::PinsReset { full });

        log::info!("Pins reset ({})", if full { "full rack" } else { "ball only" });
        true
    }

    /// Advance the simulation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.time_ticks += 1;

        match self.phase {
            SessionPhase::Resetting => {
                self.phase = SessionPhase::Idle;
            }
            SessionPhase::Rolling => self.advance_roll(dt),
            SessionPhase::Idle => {}
        }

        for pin in self.pins.iter_mut().filter(|p| p.knocked) {
            pin.fall.advance(dt);
        }
    }

    fn advance_roll(&mut self, dt: f32) {
        let outcome = self.ball.step(&self.pins, dt, &self.tuning);

        if outcome.gutter_hit {
            self.events.push(GameEvent::GutterBounce);
        }
        for id in outcome.knocked {
            self.knock_pin(id);
        }

        let Some(timer) = self.stop_timer.as_mut() else {
            return;
        };
        // The tick that arms the timer does not count toward the delay
        let armed_before = timer.is_armed();
        if outcome.should_stop {
            timer.arm(self.tuning.stop_delay);
            log::debug!(
                "Ball stopping at z={:.2} speed={:.2}",
                self.ball.position.z,
                self.ball.speed()
            );
        }
        if armed_before && timer.advance(dt) {
            self.on_ball_stop();
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            pins: self.pins.clone(),
            ball: self.ball.clone(),
            phase: self.phase,
            rolling: self.is_rolling(),
            resetting: self.is_resetting(),
            current_frame: self.scorecard.current_frame(),
            current_roll: self.scorecard.current_roll(),
            frames: self.scorecard.frames().to_vec(),
            total_score: self.scorecard.total(),
            knocked_this_roll: self.knocked_this_roll,
            pins_standing: self.pins_standing(),
            stop_pending: self.stop_timer.as_ref().and_then(StopTimer::remaining),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BALL_START, PIN_COUNT, SIM_DT};
    use crate::sim::state::RollMark;
    use glam::Vec3;

    /// Step until the session leaves Rolling (or give up)
    fn roll_out(session: &mut Session) -> u32 {
        let mut ticks = 0;
        while session.is_rolling() && ticks < 10_000 {
            session.advance(SIM_DT);
            ticks += 1;
        }
        assert!(!session.is_rolling(), "ball never stopped");
        ticks
    }

    #[test]
    fn test_throw_sets_velocity_and_rolls() {
        let mut s = Session::new(1);
        assert!(s.throw_ball(0.5, 0.25));
        assert_eq!(s.phase(), SessionPhase::Rolling);
        assert_eq!(s.ball().velocity, Vec3::new(2.0, 0.0, -30.0));
        assert_eq!(s.knocked_this_roll(), 0);
        let events = s.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::Thrown { .. }]));
    }

    #[test]
    fn test_throw_rejected_while_rolling() {
        let mut s = Session::new(1);
        assert!(s.throw_ball(1.0, 0.0));
        let before = s.ball().clone();
        assert!(!s.throw_ball(0.3, 1.0));
        assert_eq!(s.ball(), &before);
        assert_eq!(s.stop_timer().unwrap().throw_id(), 1);
    }

    #[test]
    fn test_throw_rejects_bad_power_and_clamps_spin() {
        let mut s = Session::new(1);
        assert!(!s.throw_ball(0.0, 0.0));
        assert!(!s.throw_ball(f32::NAN, 0.0));
        assert_eq!(s.phase(), SessionPhase::Idle);

        assert!(s.throw_ball(3.0, -5.0));
        assert_eq!(s.ball().velocity, Vec3::new(-8.0, 0.0, -45.0));
    }

    #[test]
    fn test_knock_pin_idempotent() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        s.knock_pin(3);
        s.knock_pin(3);
        s.knock_pin(42);
        assert_eq!(s.knocked_this_roll(), 1);
        assert_eq!(s.pins_standing(), 9);
        assert!(s.pins()[2].knocked);
    }

    #[test]
    fn test_knock_ignored_when_idle() {
        let mut s = Session::new(1);
        s.knock_pin(1);
        assert_eq!(s.pins_standing(), 10);
        assert_eq!(s.knocked_this_roll(), 0);
    }

    #[test]
    fn test_on_ball_stop_records_roll() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        for id in 1..=7 {
            s.knock_pin(id);
        }
        s.on_ball_stop();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.scorecard().frames()[0].roll1, Some(7));
        assert_eq!(s.scorecard().current_roll(), 1);
        assert_eq!(s.scorecard().total(), 7);
        assert_eq!(s.ball().position, BALL_START);
        assert_eq!(s.ball().velocity, Vec3::ZERO);

        // Stop again while idle changes nothing
        s.on_ball_stop();
        assert_eq!(s.scorecard().total(), 7);
        assert_eq!(s.scorecard().current_roll(), 1);
    }

    #[test]
    fn test_strike_advances_frame() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        for id in 1..=10 {
            s.knock_pin(id);
        }
        s.on_ball_stop();
        assert_eq!(s.scorecard().current_frame(), 1);
        assert_eq!(s.scorecard().current_roll(), 0);
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::RollFinalized {
                mark: RollMark::Strike,
                ..
            }
        )));
        assert!(events.contains(&GameEvent::FrameAdvanced { frame: 1 }));
    }

    #[test]
    fn test_reset_rejected_while_rolling() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        s.knock_pin(1);
        assert!(!s.reset_pins());
        assert!(s.is_rolling());
        assert!(s.pins()[0].knocked);
    }

    #[test]
    fn test_full_reset_after_all_knocked() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        for id in 1..=10 {
            s.knock_pin(id);
        }
        s.on_ball_stop();
        assert!(s.reset_pins());
        assert_eq!(s.pins_standing(), 10);
        assert!(s.pins().iter().all(|p| p.fall == PinFall::default()));
        assert_eq!(s.ball().position, BALL_START);
        assert_eq!(s.ball().velocity, Vec3::ZERO);
        assert!(s.is_resetting());
    }

    #[test]
    fn test_mid_frame_reset_keeps_pins_down() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        s.knock_pin(10);
        s.knock_pin(9);
        s.on_ball_stop();
        assert_eq!(s.scorecard().current_roll(), 1);

        assert!(s.reset_pins());
        assert_eq!(s.pins_standing(), 8);
        assert!(s.pins()[8].knocked && s.pins()[9].knocked);
        assert_eq!(s.drain_events().last(), Some(&GameEvent::PinsReset { full: false }));
    }

    #[test]
    fn test_throw_blocked_until_reset_settles() {
        let mut s = Session::new(1);
        assert!(s.reset_pins());
        assert!(!s.throw_ball(1.0, 0.0));
        s.advance(SIM_DT);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.throw_ball(1.0, 0.0));
    }

    #[test]
    fn test_stop_fires_after_delay() {
        let mut s = Session::new(1);
        s.throw_ball(0.01, 0.0);
        // Force the stop condition on the first tick
        s.ball.velocity = Vec3::new(0.0, 0.0, -0.1);
        s.advance(SIM_DT);
        assert!(s.is_rolling());
        assert!(s.stop_timer().unwrap().is_armed());

        // One second of simulated time at 60 Hz
        for _ in 0..59 {
            s.advance(SIM_DT);
            assert!(s.is_rolling());
        }
        let mut extra = 0;
        while s.is_rolling() {
            s.advance(SIM_DT);
            extra += 1;
            assert!(extra <= 2, "stop fired late");
        }
        assert_eq!(s.scorecard().frames()[0].roll1, Some(0));
        assert!(s.stop_timer().is_none());
    }

    #[test]
    fn test_straight_throw_scores_pins() {
        let mut s = Session::new(7);
        s.throw_ball(1.0, 0.0);
        roll_out(&mut s);
        let knocked = s.scorecard().frames()[0].roll1.unwrap();
        assert!(knocked >= 1);
        assert_eq!(knocked as usize, PIN_COUNT - s.pins_standing());
        assert_eq!(s.scorecard().total(), knocked as u32);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut s = Session::new(1);
        s.throw_ball(1.0, 0.0);
        s.knock_pin(5);
        let snap = s.snapshot();
        assert!(snap.rolling);
        assert!(!snap.resetting);
        assert_eq!(snap.pins.len(), 10);
        assert_eq!(snap.pins_standing, 9);
        assert_eq!(snap.pins_down(), 1);
        assert_eq!(snap.knocked_this_roll, 1);
        assert_eq!(snap.frames.len(), 10);
        assert_eq!(snap.stop_pending, None);

        let json = serde_json::to_string(&snap).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pins_standing, 9);
    }

    #[test]
    fn test_roll_finalizes_with_zero_stop_speed_tuning() {
        let tuning = Tuning::from_json(r#"{ "min_roll_speed": 0.0, "damping": 0.9 }"#).unwrap();
        let mut s = Session::with_tuning(99, tuning);
        assert!(s.throw_ball(0.5, 0.0));
        roll_out(&mut s);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.reset_pins());
        s.advance(SIM_DT);
        assert!(s.throw_ball(0.5, 0.0));
        assert_eq!(s.seed(), 99);
    }

    #[test]
    fn test_roll_finalizes_when_pins_would_bounce_ball_back() {
        let tuning = Tuning {
            damping: 1.0,
            curve_gain: 0.0,
            deflect_forward: 50.0,
            min_roll_speed: 0.0,
            ..Tuning::default()
        };
        let mut s = Session::with_tuning(4, tuning);
        assert!(s.throw_ball(1.0, 0.0));
        roll_out(&mut s);
        assert!(s.scorecard().frames()[0].roll1.is_some());
    }
}
