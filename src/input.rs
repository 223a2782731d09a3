//! Pointer drag to throw conversion
//!
//! The player pulls back and releases. The drag length sets power and the
//! horizontal component sets spin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FULL_POWER_DRAG_PX, MIN_DRAG_PX};

/// A throw command (power in (0, 1], spin in [-1, 1])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowCommand {
    pub power: f32,
    pub spin: f32,
}

/// A completed pointer drag in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragGesture {
    pub start: Vec2,
    pub end: Vec2,
}

impl DragGesture {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Pull-back vector (start minus end)
    pub fn pull(&self) -> Vec2 {
        self.start - self.end
    }

    /// Convert to a throw; short drags (taps) produce nothing
    pub fn to_throw(&self, viewport_width: f32) -> Option<ThrowCommand> {
        let pull = self.pull();
        let distance = pull.length();
        if !(distance > MIN_DRAG_PX) {
            return None;
        }

        let power = (distance / FULL_POWER_DRAG_PX).clamp(0.0, 1.0);
        let spin = if viewport_width > 0.0 {
            (pull.x / viewport_width * 2.0).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        Some(ThrowCommand { power, spin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drag_ignored() {
        let g = DragGesture::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 130.0));
        assert_eq!(g.to_throw(800.0), None);
    }

    #[test]
    fn test_power_scales_with_distance() {
        // Straight pull down 100px: half power, no spin
        let g = DragGesture::new(Vec2::new(400.0, 300.0), Vec2::new(400.0, 400.0));
        let t = g.to_throw(800.0).unwrap();
        assert!((t.power - 0.5).abs() < 1e-6);
        assert_eq!(t.spin, 0.0);
    }

    #[test]
    fn test_long_drag_saturates_power() {
        let g = DragGesture::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 900.0));
        assert_eq!(g.to_throw(800.0).unwrap().power, 1.0);
    }

    #[test]
    fn test_spin_from_horizontal_pull() {
        // Pull 200px left of start: dx = +200 -> spin = 200 / 800 * 2
        let g = DragGesture::new(Vec2::new(400.0, 300.0), Vec2::new(200.0, 300.0));
        let t = g.to_throw(800.0).unwrap();
        assert!((t.spin - 0.5).abs() < 1e-6);

        // Narrow viewport saturates spin
        let t = g.to_throw(100.0).unwrap();
        assert_eq!(t.spin, 1.0);
    }

    #[test]
    fn test_zero_viewport_means_no_spin() {
        let g = DragGesture::new(Vec2::new(400.0, 300.0), Vec2::new(200.0, 300.0));
        assert_eq!(g.to_throw(0.0).unwrap().spin, 0.0);
    }
}
