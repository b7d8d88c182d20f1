//! Per-hand tracking state and frame processing.
//!
//! `HandTracker` owns one [`HandTrackState`] per hand key. Each landmark
//! frame runs classifier and cursor mapper for every hand it reports and
//! ages out hands it does not.
//!
//! Staleness: a state whose key is missing from a frame keeps its values
//! (a briefly occluded pinch does not re-fire on return) and counts the miss;
//! after more than `stale_after_frames` consecutive misses it is evicted.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::classifier::{GestureClassifier, GesturePolicy};
use crate::cursor::{Cursor, CursorMapper};
use crate::landmarks::{HandKey, HandPose, LandmarkFrame};

// ════════════════════════════════════════════════════════════════════════════
// HandTrackState
// ════════════════════════════════════════════════════════════════════════════

/// Everything remembered about one hand between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandTrackState {
    /// Smoothed cursor; `None` until the first sample.
    pub cursor:            Option<Cursor>,
    pub action_active:     bool,
    pub was_action_active: bool,
    /// Middle fingertip y from the previous frame (gun policy only).
    pub prev_middle_y:     Option<f32>,
    pub palm_hold_frames:  u32,
    /// Consecutive frames this hand was not reported.
    pub missed_frames:     u32,
}

// ════════════════════════════════════════════════════════════════════════════
// HandUpdate — per-hand output of one frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct HandUpdate {
    pub key:             HandKey,
    /// Position of the hand within its frame; used as the trigger id.
    pub slot:            usize,
    pub cursor:          Cursor,
    pub active:          bool,
    pub just_started:    bool,
    pub pause_requested: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct TrackerConfig {
    pub policy:             GesturePolicy,
    pub smoothing:          f32,
    pub stale_after_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            policy:             GesturePolicy::Pinch,
            smoothing:          0.35,
            stale_after_frames: 15,
        }
    }
}

#[derive(Debug)]
pub struct HandTracker {
    hands:      HashMap<HandKey, HandTrackState>,
    classifier: GestureClassifier,
    mapper:     CursorMapper,
    stale_after_frames: u32,
}

impl HandTracker {
    pub fn new(cfg: TrackerConfig) -> Self {
        HandTracker {
            hands:      HashMap::new(),
            classifier: GestureClassifier::new(cfg.policy),
            mapper:     CursorMapper::new(cfg.smoothing),
            stale_after_frames: cfg.stale_after_frames,
        }
    }

    pub fn policy(&self) -> GesturePolicy { self.classifier.policy() }

    /// Switch shooting policy. Action and flick history are cleared so the
    /// new policy cannot inherit a half-finished gesture.
    pub fn set_policy(&mut self, policy: GesturePolicy) {
        if policy == self.classifier.policy() {
            return;
        }
        self.classifier.set_policy(policy);
        for st in self.hands.values_mut() {
            st.action_active = false;
            st.was_action_active = false;
            st.prev_middle_y = None;
        }
        debug!(%policy, "gesture policy changed");
    }

    pub fn len(&self) -> usize { self.hands.len() }
    pub fn is_empty(&self) -> bool { self.hands.is_empty() }

    pub fn state(&self, key: &HandKey) -> Option<&HandTrackState> {
        self.hands.get(key)
    }

    /// Drop every hand, e.g. when the landmark feed restarts.
    pub fn clear(&mut self) { self.hands.clear(); }

    /// Process one landmark frame.
    ///
    /// Malformed hands are skipped (their state is left as it was). A key
    /// reported twice in one frame is processed only the first time.
    pub fn process(&mut self, frame: &LandmarkFrame, pause_armed: bool) -> Vec<HandUpdate> {
        let mut updates: Vec<HandUpdate> = Vec::with_capacity(frame.hands.len());
        let mut seen: Vec<HandKey> = Vec::with_capacity(frame.hands.len());

        for (slot, obs) in frame.hands.iter().enumerate() {
            let key = HandKey::for_observation(obs, slot);
            if seen.contains(&key) {
                debug!(%key, "duplicate hand key in frame; ignoring");
                continue;
            }
            seen.push(key.clone());

            let pose = match HandPose::from_points(&obs.points) {
                Ok(p) => p,
                Err(why) => {
                    warn!(%key, seq = frame.sequence, "skipping hand: {}", why);
                    continue;
                }
            };

            let st = self.hands.entry(key.clone()).or_default();
            st.missed_frames = 0;

            let reading = self.classifier.classify(st, &pose, pause_armed);
            let cursor = self.mapper.map(&mut st.cursor, &reading.tracking, pose.scale);
            trace!(%key, x = cursor.x, y = cursor.y, active = reading.active, "hand");

            updates.push(HandUpdate {
                key,
                slot,
                cursor,
                active:          reading.active,
                just_started:    reading.just_started,
                pause_requested: reading.pause_requested,
            });
        }

        self.age_out(&seen);
        updates
    }

    fn age_out(&mut self, seen: &[HandKey]) {
        let limit = self.stale_after_frames;
        self.hands.retain(|key, st| {
            if seen.contains(key) {
                return true;
            }
            st.missed_frames += 1;
            let keep = st.missed_frames <= limit;
            if !keep {
                debug!(%key, "hand evicted after {} missed frames", st.missed_frames);
            }
            keep
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
