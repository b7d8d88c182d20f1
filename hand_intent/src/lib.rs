//! # hand_intent
//!
//! Turns a stream of noisy hand landmark sets into discrete user intent.
//!
//! ## Pipeline
//!
//! ```text
//! LandmarkFrame ──► HandTracker ──► Vec<HandUpdate> ──► ActionRouter ──► RouterEvent (UI)
//!                    │ classifier                         │              TriggerEvent (world)
//!                    │ cursor mapper                      └ UiRegistry
//!                    └ HashMap<HandKey, HandTrackState>
//! ```
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Policy | Action |
//! |---|---|---|
//! | Thumb–index pinch | `Pinch` / `Tap` | Fire, or click the hovered UI region |
//! | Gun pose + upward middle-finger flick | `Gun` | Fire, or click the hovered UI region |
//! | Open palm held ~20 frames | any (while playing) | Pause |
//!
//! The crate is I/O-free: landmark frames come in, events go out, and the
//! caller decides when frames are applied (always on its own render thread).

pub mod landmarks;
pub mod classifier;
pub mod cursor;
pub mod tracker;
pub mod router;

pub use landmarks::{HandKey, HandObservation, HandPose, HandSketch, Landmark, LandmarkFrame, PoseRejection};
pub use classifier::{GestureClassifier, GesturePolicy, GestureReading};
pub use cursor::{Cursor, CursorMapper};
pub use tracker::{HandTrackState, HandTracker, HandUpdate, TrackerConfig};
pub use router::{ActionRouter, Rect, RouteMode, Routed, RouterEvent, TriggerEvent, UiRegion, UiRegistry};
