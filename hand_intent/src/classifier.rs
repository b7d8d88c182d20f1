//! Gesture classification: landmark pose → fire/click state.
//!
//! Three shooting policies share one interface. All distance thresholds are
//! multiples of [`HandPose::scale`], so a hand close to the camera and one at
//! arm's length classify the same way.
//!
//! | Policy | Active when | Tracking point |
//! |---|---|---|
//! | Pinch | thumb–index gap < 0.22 × scale (released above 1.5 × that) | thumb tip |
//! | Gun   | gun pose held **and** middle tip flicks up faster than 0.025/frame | index tip |
//! | Tap   | same as Pinch | thumb tip |
//!
//! The open-palm pause timer runs alongside whichever policy is selected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landmarks::{HandPose, Landmark, INDEX_TIP, THUMB_TIP};
use crate::tracker::HandTrackState;

// ════════════════════════════════════════════════════════════════════════════
// Thresholds (hand scales unless noted)
// ════════════════════════════════════════════════════════════════════════════

pub const PINCH_RATIO:          f32 = 0.22;
pub const PINCH_RELEASE_FACTOR: f32 = 1.5;
pub const GUN_INDEX_EXTENDED:   f32 = 1.7;
pub const GUN_RING_CURLED:      f32 = 1.1;
pub const GUN_PINKY_CURLED:     f32 = 1.0;
/// Middle-tip Δy per frame, normalized image units (negative = upward).
pub const GUN_FLICK_DY:         f32 = -0.025;
pub const OPEN_PALM_RATIO:      f32 = 1.65;
/// Consecutive open-palm frames that must be exceeded to request a pause.
pub const PAUSE_HOLD_FRAMES:    u32 = 18;

// ════════════════════════════════════════════════════════════════════════════
// GesturePolicy
// ════════════════════════════════════════════════════════════════════════════

/// Which hand shape means "fire".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePolicy {
    #[default]
    Pinch,
    Gun,
    /// Pointer-parity mode; detected exactly like a pinch.
    Tap,
}

impl GesturePolicy {
    /// Landmark index the cursor follows under this policy.
    pub fn tracking_index(self) -> usize {
        match self {
            GesturePolicy::Pinch | GesturePolicy::Tap => THUMB_TIP,
            GesturePolicy::Gun => INDEX_TIP,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GesturePolicy::Pinch => "pinch",
            GesturePolicy::Gun   => "gun",
            GesturePolicy::Tap   => "tap",
        }
    }
}

impl fmt::Display for GesturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GesturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pinch" => Ok(GesturePolicy::Pinch),
            "gun"   => Ok(GesturePolicy::Gun),
            "tap"   => Ok(GesturePolicy::Tap),
            other   => Err(format!("unknown gesture policy '{}'", other)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pose predicates
// ════════════════════════════════════════════════════════════════════════════

/// Pinch state with asymmetric hysteresis: engage below the threshold,
/// release only above 1.5 × the threshold.
pub fn pinch_engaged(was_engaged: bool, pose: &HandPose) -> bool {
    let gap = pose.thumb_tip.dist2d(&pose.index_tip);
    let threshold = pose.scale * PINCH_RATIO;
    if was_engaged {
        gap <= threshold * PINCH_RELEASE_FACTOR
    } else {
        gap < threshold
    }
}

/// Index out, ring and pinky folded.
pub fn is_gun_pose(pose: &HandPose) -> bool {
    pose.reach(&pose.index_tip) > GUN_INDEX_EXTENDED
        && pose.reach(&pose.ring_tip) < GUN_RING_CURLED
        && pose.reach(&pose.pinky_tip) < GUN_PINKY_CURLED
}

/// Gun pose plus an upward middle-finger flick this frame.
pub fn gun_fired(pose: &HandPose, middle_dy: f32) -> bool {
    is_gun_pose(pose) && middle_dy < GUN_FLICK_DY
}

/// All four non-thumb fingertips well away from the wrist.
pub fn is_open_palm(pose: &HandPose) -> bool {
    [pose.index_tip, pose.middle_tip, pose.ring_tip, pose.pinky_tip]
        .iter()
        .all(|tip| pose.reach(tip) > OPEN_PALM_RATIO)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Result of classifying one hand for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub active:          bool,
    /// False → true transition of `active` this frame.
    pub just_started:    bool,
    /// Open palm held long enough; reported once per hold.
    pub pause_requested: bool,
    /// Point the cursor should follow.
    pub tracking:        Landmark,
}

#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    policy: GesturePolicy,
}

impl GestureClassifier {
    pub fn new(policy: GesturePolicy) -> Self {
        GestureClassifier { policy }
    }

    pub fn policy(&self) -> GesturePolicy { self.policy }

    pub fn set_policy(&mut self, policy: GesturePolicy) {
        self.policy = policy;
    }

    /// Classify `pose` and fold the result into `state`.
    ///
    /// `pause_armed` is true only while a round is being played; the palm
    /// timer stays at zero otherwise.
    pub fn classify(
        &self,
        state: &mut HandTrackState,
        pose: &HandPose,
        pause_armed: bool,
    ) -> GestureReading {
        let was = state.action_active;

        let (active, tracking) = match self.policy {
            GesturePolicy::Pinch | GesturePolicy::Tap => {
                (pinch_engaged(was, pose), pose.thumb_tip)
            }
            GesturePolicy::Gun => {
                let y = pose.middle_tip.y;
                let prev = state.prev_middle_y.unwrap_or(y);
                state.prev_middle_y = Some(y);
                (gun_fired(pose, y - prev), pose.index_tip)
            }
        };

        state.was_action_active = was;
        state.action_active = active;
        let just_started = !was && active;
        if just_started {
            debug!(policy = %self.policy, "action started");
        }

        let pause_requested = Self::advance_palm_timer(state, pose, pause_armed);

        GestureReading { active, just_started, pause_requested, tracking }
    }

    fn advance_palm_timer(state: &mut HandTrackState, pose: &HandPose, armed: bool) -> bool {
        if armed && is_open_palm(pose) {
            state.palm_hold_frames += 1;
            if state.palm_hold_frames > PAUSE_HOLD_FRAMES {
                state.palm_hold_frames = 0;
                debug!("open palm held, pause requested");
                return true;
            }
        } else {
            state.palm_hold_frames = 0;
        }
        false
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HandSketch, WRIST};
    use proptest::prelude::*;

    fn pose(sketch: HandSketch) -> HandPose {
        HandPose::from_points(&sketch.place(WRIST, 0.5, 0.8)).unwrap()
    }

    fn pinch_gap(gap: f32) -> HandPose {
        pose(HandSketch::relaxed(0.1).with_thumb_gap(gap))
    }

    #[test]
    fn pinch_engages_below_threshold() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        let r = c.classify(&mut st, &pinch_gap(0.15), false);
        assert!(r.active && r.just_started);
    }

    #[test]
    fn pinch_holds_inside_hysteresis_band() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        c.classify(&mut st, &pinch_gap(0.1), false);
        // 0.3 is above the engage threshold but below the release one.
        let r = c.classify(&mut st, &pinch_gap(0.3), false);
        assert!(r.active);
        assert!(!r.just_started);
        let r = c.classify(&mut st, &pinch_gap(0.4), false);
        assert!(!r.active);
    }

    #[test]
    fn band_does_not_engage_from_open() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        let r = c.classify(&mut st, &pinch_gap(0.3), false);
        assert!(!r.active);
    }

    #[test]
    fn edge_fires_once_per_hold() {
        let c = GestureClassifier::new(GesturePolicy::Tap);
        let mut st = HandTrackState::default();
        let edges = (0..10)
            .map(|_| c.classify(&mut st, &pinch_gap(0.05), false))
            .filter(|r| r.just_started)
            .count();
        assert_eq!(edges, 1);
    }

    #[test]
    fn tracking_point_follows_policy() {
        let p = pinch_gap(1.0);
        let mut st = HandTrackState::default();
        let pinch = GestureClassifier::new(GesturePolicy::Pinch).classify(&mut st, &p, false);
        let gun   = GestureClassifier::new(GesturePolicy::Gun).classify(&mut st, &p, false);
        assert_eq!(pinch.tracking, p.thumb_tip);
        assert_eq!(gun.tracking, p.index_tip);
    }

    #[test]
    fn static_gun_pose_never_fires() {
        let c = GestureClassifier::new(GesturePolicy::Gun);
        let mut st = HandTrackState::default();
        let gun = pose(HandSketch::relaxed(0.1).gun());
        for _ in 0..5 {
            assert!(!c.classify(&mut st, &gun, false).active);
        }
    }

    #[test]
    fn gun_flick_fires_once() {
        let c = GestureClassifier::new(GesturePolicy::Gun);
        let mut st = HandTrackState::default();
        let rest  = pose(HandSketch::relaxed(0.1).gun());
        let flick = pose(HandSketch::relaxed(0.1).gun().with_middle_lift(-0.04));
        assert!(!c.classify(&mut st, &rest, false).active);
        let r = c.classify(&mut st, &flick, false);
        assert!(r.active && r.just_started);
        // Held still at the flicked position: no velocity, no fire.
        assert!(!c.classify(&mut st, &flick, false).active);
    }

    #[test]
    fn flick_without_gun_pose_is_ignored() {
        let c = GestureClassifier::new(GesturePolicy::Gun);
        let mut st = HandTrackState::default();
        c.classify(&mut st, &pose(HandSketch::relaxed(0.1)), false);
        let r = c.classify(&mut st, &pose(HandSketch::relaxed(0.1).with_middle_lift(-0.05)), false);
        assert!(!r.active);
    }

    #[test]
    fn palm_hold_requests_pause_once() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        let palm = pose(HandSketch::relaxed(0.1).open_palm());
        let pauses: Vec<usize> = (0..40)
            .filter(|_| c.classify(&mut st, &palm, true).pause_requested)
            .collect();
        // Fires on frame PAUSE_HOLD_FRAMES + 1, counter resets, fires again.
        assert_eq!(pauses.len(), 2);
        assert_eq!(pauses[0], PAUSE_HOLD_FRAMES as usize);
    }

    #[test]
    fn palm_timer_resets_when_pose_breaks() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        let palm = pose(HandSketch::relaxed(0.1).open_palm());
        for _ in 0..10 { c.classify(&mut st, &palm, true); }
        c.classify(&mut st, &pose(HandSketch::relaxed(0.1)), true);
        assert_eq!(st.palm_hold_frames, 0);
    }

    #[test]
    fn palm_ignored_when_unarmed() {
        let c = GestureClassifier::new(GesturePolicy::Pinch);
        let mut st = HandTrackState::default();
        let palm = pose(HandSketch::relaxed(0.1).open_palm());
        assert!((0..60).all(|_| !c.classify(&mut st, &palm, false).pause_requested));
    }

    #[test]
    fn policy_parses() {
        assert_eq!("Gun".parse::<GesturePolicy>(), Ok(GesturePolicy::Gun));
        assert!("fist".parse::<GesturePolicy>().is_err());
    }

    proptest! {
        // Transitions only happen across the correct side of the band.
        #[test]
        fn pinch_transitions_respect_hysteresis(gaps in prop::collection::vec(0.0f32..0.6, 1..80)) {
            let c = GestureClassifier::new(GesturePolicy::Pinch);
            let mut st = HandTrackState::default();
            for g in gaps {
                let p = pinch_gap(g);
                let before = st.action_active;
                let r = c.classify(&mut st, &p, false);
                let gap = p.thumb_tip.dist2d(&p.index_tip);
                let threshold = p.scale * PINCH_RATIO;
                if !before && r.active {
                    prop_assert!(gap < threshold);
                }
                if before && !r.active {
                    prop_assert!(gap > threshold * PINCH_RELEASE_FACTOR);
                }
            }
        }

        // One dip below and one rise above the band releases exactly once.
        #[test]
        fn one_excursion_one_release(low in 0.0f32..0.2, high in 0.34f32..0.9, hold in 1usize..10) {
            let c = GestureClassifier::new(GesturePolicy::Pinch);
            let mut st = HandTrackState::default();
            let mut releases = 0;
            let seq = std::iter::repeat(low).take(hold).chain(std::iter::repeat(high).take(hold));
            for g in seq {
                let before = st.action_active;
                let r = c.classify(&mut st, &pinch_gap(g), false);
                if before && !r.active { releases += 1; }
            }
            prop_assert_eq!(releases, 1);
        }
    }
}
