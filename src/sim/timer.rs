//! One-shot stop debounce
//!
//! Once the ball meets its stop condition the roll is finalized after a fixed
//! delay of simulated time, exactly once. The session owns one `StopTimer` per
//! throw and replaces it on every new throw.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TimerState {
    Idle,
    Armed,
    Fired,
}

/// Deferred fire-once callback handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTimer {
    /// Throw this timer belongs to
    throw_id: u32,
    state: TimerState,
    delay: f32,
    elapsed: f32,
}

impl StopTimer {
    pub fn new(throw_id: u32) -> Self {
        Self {
            throw_id,
            state: TimerState::Idle,
            delay: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn throw_id(&self) -> u32 {
        self.throw_id
    }

    /// Start counting down. Ignored once armed or fired.
    pub fn arm(&mut self, delay: f32) {
        if self.state == TimerState::Idle {
            self.state = TimerState::Armed;
            self.delay = delay.max(0.0);
            self.elapsed = 0.0;
        }
    }

    /// Disarm without firing; the handle can never fire afterwards
    pub fn cancel(&mut self) {
        self.state = TimerState::Fired;
    }

    pub fn is_armed(&self) -> bool {
        self.state == TimerState::Armed
    }

    /// Seconds left before firing, None unless armed
    pub fn remaining(&self) -> Option<f32> {
        self.is_armed().then(|| (self.delay - self.elapsed).max(0.0))
    }

    /// Advance by `dt`; true exactly once, when the delay has elapsed
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state != TimerState::Armed {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.delay {
            self.state = TimerState::Fired;
            return true;
        }
        false
    }
}
