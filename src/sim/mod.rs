//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only (and only for cosmetics)
//! - Stable iteration order (pins by id)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod pinfall;
pub mod scoring;
pub mod session;
pub mod state;
pub mod tick;
pub mod timer;

pub use ball::{BallSim, StepOutcome, launch_velocity};
pub use collision::{CollisionResult, ball_pin_collision, gutter_wall_collision};
pub use pinfall::PinFall;
pub use scoring::{RollResult, Scorecard};
pub use session::{Session, SessionSnapshot};
pub use state::{Frame, GameEvent, Pin, PinId, RollMark, SessionPhase, rack};
pub use tick::{TickInput, tick};
pub use timer::StopTimer;
