//! # void_recon
//!
//! Hands-free shooting gallery. Hand landmarks from a camera-style tracker
//! (or the mouse simulation) become a smoothed cursor and a trigger; targets
//! fly out of the void toward the player and burst when shot.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Style | Action |
//! |---|---|---|
//! | Thumb and index pinch | Pinch / Tap | Fire, or click the button under the cursor |
//! | Middle finger flicks up while making a gun | Gun | Fire, or click |
//! | Open palm held ~18 frames | Any | Pause the round |
//! | Hand position | Any | Moves the cursor (mirrored, far hands amplified) |
//!
//! In two-hand mode every tracked hand gets its own cursor and trigger.
//!
//! ## Phases
//!
//! `Menu → Starting (countdown) → Playing ⇄ Paused → GameOver → Starting …`
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: the mouse drives a synthetic hand.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Mouse move | Primary hand position |
//! | Left button / `Space` | Primary hand fires |
//! | Right button / `J` | Second (mirrored) hand fires |
//! | `H` (hold) | Open palm |
//! | `P` | Pause / resume |
//! | `Escape` | Back to menu |
//! | `M` | Sound on / off |
//! | `R` | Restart hand tracking |
//! | `Q` | Quit |

pub mod app;
pub mod config;
pub mod error;
pub mod layout;
pub mod sound;
pub mod source;
pub mod visualizer;
