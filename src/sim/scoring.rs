//! Frame and score bookkeeping
//!
//! Scoring is purely additive: a frame is worth the pins it knocked down.
//! Strikes and spares end or fill a frame but carry no bonus.

use serde::{Deserialize, Serialize};

use super::state::{Frame, RollMark};
use crate::consts::{FRAME_COUNT, PIN_COUNT};

/// Last frame index; the tracker never advances past it
pub const LAST_FRAME: usize = FRAME_COUNT - 1;

/// What recording a roll did to the scorecard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Frame the roll was written to
    pub frame: usize,
    /// Roll slot written (0 or 1)
    pub roll: u8,
    pub knocked: u8,
    pub mark: RollMark,
    /// Frame finished with this roll
    pub frame_complete: bool,
}

/// The ten-frame scoresheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    frames: [Frame; FRAME_COUNT],
    current_frame: usize,
    current_roll: u8,
    total: u32,
}

impl Default for Scorecard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorecard {
    pub fn new() -> Self {
        Self {
            frames: [Frame::default(); FRAME_COUNT],
            current_frame: 0,
            current_roll: 0,
            total: 0,
        }
    }

    pub fn frames(&self) -> &[Frame; FRAME_COUNT] {
        &self.frames
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_roll(&self) -> u8 {
        self.current_roll
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Record the pins knocked by the roll just finished
    pub fn record_roll(&mut self, knocked: u8) -> RollResult {
        let knocked = knocked.min(PIN_COUNT as u8);
        let frame_index = self.current_frame;
        let roll = self.current_roll;

        let frame = &mut self.frames[frame_index];
        if roll == 0 {
            frame.roll1 = Some(knocked);
        } else {
            frame.roll2 = Some(knocked);
        }

        self.total = self.frames.iter().map(Frame::pins).sum();

        let is_strike = roll == 0 && knocked == PIN_COUNT as u8;
        let frame_complete = roll == 1 || is_strike;

        let mark = if is_strike {
            RollMark::Strike
        } else if roll == 1 && self.frames[frame_index].is_spare() {
            RollMark::Spare
        } else if frame_complete {
            RollMark::Open
        } else {
            RollMark::Pending
        };

        if frame_complete {
            self.current_frame = (self.current_frame + 1).min(LAST_FRAME);
            self.current_roll = 0;
        } else {
            self.current_roll = 1;
        }

        log::debug!(
            "frame {} roll {}: {} pins ({:?}), total {}",
            frame_index + 1,
            roll + 1,
            knocked,
            mark,
            self.total
        );

        RollResult {
            frame: frame_index,
            roll,
            knocked,
            mark,
            frame_complete,
        }
    }
}
