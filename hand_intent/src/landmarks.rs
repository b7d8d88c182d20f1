//! Hand landmark model.
//!
//! The inference collaborator reports 21 ordered keypoints per tracked hand,
//! positions normalized to the camera image (x right, y down, both 0.0–1.0).
//! Only seven of them drive gestures; [`HandPose`] pulls those out and
//! validates them once so the classifier and cursor mapper can assume sane
//! input.

use std::fmt;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_TIP:  usize = 20;

/// Keypoints per hand in a complete landmark set.
pub const LANDMARK_COUNT: usize = 21;

/// Hand scales below this are treated as degenerate tracking data.
pub const MIN_HAND_SCALE: f32 = 1e-4;

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandKey / frames
// ════════════════════════════════════════════════════════════════════════════

/// One 3D keypoint in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane. Depth is ignored: the inference depth
    /// estimate is too noisy to threshold on.
    pub fn dist2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Identity of a tracked hand across frames.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandKey {
    /// Handedness label reported by the tracker ("Left" / "Right").
    Label(String),
    /// Position in the frame, used when no label was reported.
    Slot(usize),
}

impl HandKey {
    pub fn for_observation(obs: &HandObservation, slot: usize) -> Self {
        match obs.handedness.as_deref() {
            Some(label) if !label.is_empty() => HandKey::Label(label.to_string()),
            _ => HandKey::Slot(slot),
        }
    }
}

impl fmt::Display for HandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandKey::Label(l) => write!(f, "{}", l),
            HandKey::Slot(i)  => write!(f, "hand-{}", i),
        }
    }
}

/// One tracked hand as delivered by the inference collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandObservation {
    pub handedness: Option<String>,
    pub points:     Vec<Landmark>,
}

impl HandObservation {
    pub fn new(handedness: Option<&str>, points: Vec<Landmark>) -> Self {
        HandObservation {
            handedness: handedness.map(str::to_string),
            points,
        }
    }
}

/// Everything one inference cycle produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    /// Monotonic cycle counter assigned by the source.
    pub sequence: u64,
    pub hands:    Vec<HandObservation>,
}

// ════════════════════════════════════════════════════════════════════════════
// HandPose — the validated subset used by gestures
// ════════════════════════════════════════════════════════════════════════════

/// Why a hand's landmark set was skipped for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PoseRejection {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    TooFewPoints(usize),
    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
    #[error("hand scale {0} is degenerate")]
    DegenerateScale(f32),
}

/// The seven keypoints gestures are built from, plus the scale reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    pub wrist:      Landmark,
    pub thumb_tip:  Landmark,
    pub index_mcp:  Landmark,
    pub index_tip:  Landmark,
    pub middle_tip: Landmark,
    pub ring_tip:   Landmark,
    pub pinky_tip:  Landmark,
    /// `dist2d(index_mcp, wrist)`; every threshold is a multiple of this.
    pub scale:      f32,
}

impl HandPose {
    pub fn from_points(points: &[Landmark]) -> Result<Self, PoseRejection> {
        if points.len() < LANDMARK_COUNT {
            return Err(PoseRejection::TooFewPoints(points.len()));
        }
        for idx in [WRIST, THUMB_TIP, INDEX_MCP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            if !points[idx].is_finite() {
                return Err(PoseRejection::NonFinite(idx));
            }
        }

        let scale = points[INDEX_MCP].dist2d(&points[WRIST]);
        if scale < MIN_HAND_SCALE {
            return Err(PoseRejection::DegenerateScale(scale));
        }

        Ok(HandPose {
            wrist:      points[WRIST],
            thumb_tip:  points[THUMB_TIP],
            index_mcp:  points[INDEX_MCP],
            index_tip:  points[INDEX_TIP],
            middle_tip: points[MIDDLE_TIP],
            ring_tip:   points[RING_TIP],
            pinky_tip:  points[PINKY_TIP],
            scale,
        })
    }

    /// Fingertip distance from the wrist, in hand scales.
    pub fn reach(&self, tip: &Landmark) -> f32 {
        tip.dist2d(&self.wrist) / self.scale
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSketch — synthetic hands for the simulator and tests
// ════════════════════════════════════════════════════════════════════════════

/// Builds a plausible 21-point hand from a handful of shape parameters.
///
/// Fingers point up the image (−y) from the wrist. Distances are in hand
/// scales, so `extension[0] = 1.8` puts the index tip 1.8 × scale from the
/// wrist.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSketch {
    pub scale:       f32,
    /// Thumb tip to index tip, in hand scales.
    pub thumb_gap:   f32,
    /// Index, middle, ring, pinky tip distance from the wrist.
    pub extension:   [f32; 4],
    /// Extra vertical offset of the middle fingertip (image units).
    pub middle_lift: f32,
}

// Finger fan, radians off vertical: index, middle, ring, pinky.
const FAN: [f32; 4] = [-0.22, -0.07, 0.07, 0.22];

impl HandSketch {
    /// Loose, half-open hand: no gesture fires.
    pub fn relaxed(scale: f32) -> Self {
        HandSketch {
            scale,
            thumb_gap:   1.0,
            extension:   [1.5, 1.5, 1.3, 1.2],
            middle_lift: 0.0,
        }
    }

    pub fn pinching(mut self) -> Self {
        self.thumb_gap = 0.1;
        self
    }

    pub fn open_palm(mut self) -> Self {
        self.extension = [2.0, 2.1, 2.0, 1.8];
        self
    }

    /// Index out, ring and pinky folded, thumb away from the index.
    pub fn gun(mut self) -> Self {
        self.extension = [2.0, 1.4, 0.8, 0.7];
        self
    }

    pub fn with_thumb_gap(mut self, gap: f32) -> Self {
        self.thumb_gap = gap;
        self
    }

    pub fn with_middle_lift(mut self, dy: f32) -> Self {
        self.middle_lift = dy;
        self
    }

    /// Lay the hand out so that landmark `anchor` sits at `(x, y)`.
    pub fn place(&self, anchor: usize, x: f32, y: f32) -> Vec<Landmark> {
        let mut pts = self.layout();
        let a = pts[anchor.min(LANDMARK_COUNT - 1)];
        for p in &mut pts {
            p.x += x - a.x;
            p.y += y - a.y;
        }
        pts
    }

    /// Wrist-relative layout (wrist at the origin).
    fn layout(&self) -> Vec<Landmark> {
        let s = self.scale;
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];

        let mcps = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
        for (f, &mcp) in mcps.iter().enumerate() {
            let (sin, cos) = FAN[f].sin_cos();
            // Index MCP sits straight up so the scale reference is exact.
            let base = if mcp == INDEX_MCP {
                Landmark::new(0.0, -s, 0.0)
            } else {
                Landmark::new(sin * s, -cos * s, 0.0)
            };
            let reach = self.extension[f] * s;
            let mut tip = Landmark::new(sin * reach, -cos * reach, 0.0);
            if f == 1 {
                tip.y += self.middle_lift;
            }
            pts[mcp] = base;
            pts[mcp + 1] = lerp(base, tip, 1.0 / 3.0);
            pts[mcp + 2] = lerp(base, tip, 2.0 / 3.0);
            pts[mcp + 3] = tip;
        }

        let index_tip = pts[INDEX_TIP];
        let thumb_tip = Landmark::new(index_tip.x - self.thumb_gap * s, index_tip.y, 0.0);
        let origin = pts[WRIST];
        pts[THUMB_CMC] = lerp(origin, thumb_tip, 0.25);
        pts[THUMB_MCP] = lerp(origin, thumb_tip, 0.5);
        pts[THUMB_IP]  = lerp(origin, thumb_tip, 0.75);
        pts[THUMB_TIP] = thumb_tip;
        pts
    }
}

fn lerp(a: Landmark, b: Landmark, t: f32) -> Landmark {
    Landmark::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, a.z + (b.z - a.z) * t)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
