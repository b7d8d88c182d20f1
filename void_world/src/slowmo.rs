//! Combo slow motion.
//!
//! Chaining a hit onto a live combo slows the world to a quarter speed and
//! eases it back to normal over two seconds. The scale applies to every
//! per-frame delta; spawn scheduling stays on the wall clock.

pub const SLOW_MO_DURATION_MS: u64 = 2000;
pub const SLOW_MO_MIN_SCALE:   f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlowMotion {
    end_ms: Option<u64>,
}

impl SlowMotion {
    /// (Re)start the effect; a second trigger extends rather than stacks.
    pub fn trigger(&mut self, now_ms: u64) {
        self.end_ms = Some(now_ms + SLOW_MO_DURATION_MS);
    }

    pub fn clear(&mut self) { self.end_ms = None; }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.end_ms.is_some_and(|end| now_ms < end)
    }

    /// Multiplier applied to target motion at `now_ms`, in 0.25–1.0.
    pub fn time_scale(&self, now_ms: u64) -> f32 {
        match self.end_ms {
            Some(end) if now_ms < end => {
                let remaining = (end - now_ms) as f32;
                let progress = 1.0 - remaining / SLOW_MO_DURATION_MS as f32;
                SLOW_MO_MIN_SCALE + (1.0 - SLOW_MO_MIN_SCALE) * progress
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn idle_is_full_speed() {
        assert_eq!(SlowMotion::default().time_scale(12_345), 1.0);
    }

    #[test]
    fn eases_from_quarter_to_full() {
        let mut s = SlowMotion::default();
        s.trigger(1000);
        assert_relative_eq!(s.time_scale(1000), 0.25);
        assert_relative_eq!(s.time_scale(2000), 0.625);
        assert_relative_eq!(s.time_scale(3000), 1.0);
        assert!(!s.is_active(3000));
    }

    #[test]
    fn scale_never_decreases_while_active() {
        let mut s = SlowMotion::default();
        s.trigger(0);
        let mut prev = 0.0;
        for t in (0..=2000).step_by(50) {
            let k = s.time_scale(t);
            assert!(k >= prev);
            assert!((SLOW_MO_MIN_SCALE..=1.0).contains(&k));
            prev = k;
        }
    }

    #[test]
    fn retrigger_restarts() {
        let mut s = SlowMotion::default();
        s.trigger(0);
        s.trigger(1500);
        assert_relative_eq!(s.time_scale(1500), 0.25);
        assert!(s.is_active(3000));
    }
}
