//! Cursor mapping: tracking point → smoothed screen percentage.
//!
//! The camera faces the user, so image x is mirrored. Small (far-away) hands
//! get their motion amplified around the screen centre; near hands are left
//! at 1:1. The result is exponentially smoothed per hand.

use crate::landmarks::Landmark;

pub const SENSITIVITY_REFERENCE: f32 = 0.18;
pub const MIN_SENSITIVITY:       f32 = 1.0;
pub const MAX_SENSITIVITY:       f32 = 3.5;
pub const MIN_SMOOTHING:         f32 = 0.35;
pub const MAX_SMOOTHING:         f32 = 0.45;

/// Screen position in percent, both axes 0.0–100.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub fn new(x: f32, y: f32) -> Self { Cursor { x, y } }

    /// Position in the 0.0–1.0 range used by trigger events.
    pub fn normalized(&self) -> (f32, f32) { (self.x / 100.0, self.y / 100.0) }

    /// Position in pixels for a viewport of `width × height`.
    pub fn to_pixels(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x / 100.0 * width, self.y / 100.0 * height)
    }

    fn clamped(self) -> Self {
        Cursor::new(self.x.clamp(0.0, 100.0), self.y.clamp(0.0, 100.0))
    }
}

/// Motion gain for a hand of the given scale.
///
/// Callers must have rejected degenerate scales already; a zero scale would
/// saturate at [`MAX_SENSITIVITY`] rather than divide by zero anyway.
pub fn sensitivity(hand_scale: f32) -> f32 {
    if hand_scale <= 0.0 {
        return MAX_SENSITIVITY;
    }
    (SENSITIVITY_REFERENCE / hand_scale).clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorMapper {
    alpha: f32,
}

impl Default for CursorMapper {
    fn default() -> Self { CursorMapper { alpha: MIN_SMOOTHING } }
}

impl CursorMapper {
    /// `alpha` is clamped into the supported 0.35–0.45 band.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_finite() { alpha } else { MIN_SMOOTHING };
        CursorMapper { alpha: alpha.clamp(MIN_SMOOTHING, MAX_SMOOTHING) }
    }

    pub fn alpha(&self) -> f32 { self.alpha }

    /// Mirrored, gain-adjusted position before smoothing. May fall outside
    /// 0–100 for far hands.
    pub fn raw_position(&self, tracking: &Landmark, hand_scale: f32) -> Cursor {
        let raw_x = (1.0 - tracking.x) * 100.0;
        let raw_y = tracking.y * 100.0;
        let gain = sensitivity(hand_scale);
        Cursor::new(50.0 + (raw_x - 50.0) * gain, 50.0 + (raw_y - 50.0) * gain)
    }

    /// Fold `raw` into the per-hand smoothing state and return the clamped
    /// output. An empty state snaps to the first sample.
    pub fn smooth(&self, state: &mut Option<Cursor>, raw: Cursor) -> Cursor {
        let s = state.get_or_insert(raw);
        s.x += (raw.x - s.x) * self.alpha;
        s.y += (raw.y - s.y) * self.alpha;
        s.clamped()
    }

    pub fn map(&self, state: &mut Option<Cursor>, tracking: &Landmark, hand_scale: f32) -> Cursor {
        let raw = self.raw_position(tracking, hand_scale);
        self.smooth(state, raw)
    }

    /// Frames needed for an initial gap `d0` to shrink below `epsilon`
    /// under constant input: smallest `n` with `d0·(1−α)ⁿ < ε`.
    pub fn frames_to_settle(&self, d0: f32, epsilon: f32) -> u32 {
        if d0.abs() < epsilon || epsilon <= 0.0 {
            return 0;
        }
        let n = (epsilon / d0.abs()).ln() / (1.0 - self.alpha).ln();
        n.floor() as u32 + 1
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
