//! Per-frame simulation tick
//!
//! Applies the player's commands for this tick, then advances the session.

use super::session::Session;
use crate::input::ThrowCommand;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Throw released this tick
    pub throw: Option<ThrowCommand>,
    /// Reset button pressed
    pub reset: bool,
}

impl TickInput {
    /// Clear one-shot commands after they have been consumed
    pub fn clear(&mut self) {
        self.throw = None;
        self.reset = false;
    }
}

/// Advance the session by one timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    if input.reset {
        session.reset_pins();
    }

    if let Some(cmd) = input.throw {
        session.throw_ball(cmd.power, cmd.spin);
    }

    session.advance(dt);
}
