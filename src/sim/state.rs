//! Game state and core simulation types

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pinfall::PinFall;
use crate::consts::PIN_COUNT;

/// Pin identifier, 1..=10
pub type PinId = u8;

/// Session phase. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a throw
    #[default]
    Idle,
    /// Ball in motion (including the stop debounce)
    Rolling,
    /// Pins/ball just reset; throws blocked until the next tick
    Resetting,
}

/// A bowling pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    /// Rest position, fixed per pin
    pub position: Vec3,
    pub knocked: bool,
    /// Cosmetic fall pose (not gameplay-affecting)
    #[serde(default)]
    pub fall: PinFall,
}

impl Pin {
    pub fn new(id: PinId, position: Vec3) -> Self {
        Self {
            id,
            position,
            knocked: false,
            fall: PinFall::default(),
        }
    }

    /// Stand the pin back up
    pub fn restand(&mut self) {
        self.knocked = false;
        self.fall = PinFall::default();
    }
}

/// Rest positions in id order: back row of four, then three, two, head pin
const RACK: [(f32, f32); PIN_COUNT] = [
    (-1.5, -25.0),
    (-0.5, -25.0),
    (0.5, -25.0),
    (1.5, -25.0),
    (-1.0, -24.0),
    (0.0, -24.0),
    (1.0, -24.0),
    (-0.5, -23.0),
    (0.5, -23.0),
    (0.0, -22.0),
];

/// Pin center height above the lane
const PIN_HEIGHT: f32 = 0.5;

/// A full rack of standing pins, sorted by id
pub fn rack() -> Vec<Pin> {
    RACK.iter()
        .enumerate()
        .map(|(i, &(x, z))| Pin::new(i as PinId + 1, Vec3::new(x, PIN_HEIGHT, z)))
        .collect()
}

/// How a roll or frame reads on the scoresheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollMark {
    Strike,
    Spare,
    /// Frame finished without clearing the rack
    Open,
    /// First ball thrown, second pending
    Pending,
}

/// One scoring frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub roll1: Option<u8>,
    pub roll2: Option<u8>,
}

impl Frame {
    /// Sum of recorded rolls (no bonuses)
    pub fn pins(&self) -> u32 {
        self.roll1.unwrap_or(0) as u32 + self.roll2.unwrap_or(0) as u32
    }

    pub fn is_strike(&self) -> bool {
        self.roll1 == Some(10)
    }

    pub fn is_spare(&self) -> bool {
        match (self.roll1, self.roll2) {
            (Some(a), Some(b)) => a < 10 && a as u32 + b as u32 == 10,
            _ => false,
        }
    }

    /// Scoresheet mark, None for an unplayed frame
    pub fn mark(&self) -> Option<RollMark> {
        match (self.roll1, self.roll2) {
            (None, _) => None,
            _ if self.is_strike() => Some(RollMark::Strike),
            _ if self.is_spare() => Some(RollMark::Spare),
            (Some(_), None) => Some(RollMark::Pending),
            (Some(_), Some(_)) => Some(RollMark::Open),
        }
    }

    /// Scoresheet notation: "X", "7/", "7 2", "7" or "-"
    pub fn display(&self) -> String {
        match (self.mark(), self.roll1, self.roll2) {
            (None, _, _) => "-".to_string(),
            (Some(RollMark::Strike), _, _) => "X".to_string(),
            (Some(RollMark::Spare), Some(a), _) => format!("{}/", a),
            (Some(RollMark::Open), Some(a), Some(b)) => format!("{} {}", a, b),
            (_, Some(a), _) => a.to_string(),
            _ => "-".to_string(),
        }
    }
}

/// Events emitted by the session for the presentation layer (sounds, banners)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Thrown { power: f32, spin: f32 },
    PinKnocked { id: PinId },
    /// Ball hit a gutter wall
    GutterBounce,
    RollFinalized {
        frame: usize,
        roll: u8,
        knocked: u8,
        mark: RollMark,
    },
    FrameAdvanced { frame: usize },
    PinsReset { full: bool },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
