//! Application configuration.
//!
//! Defaults, then an optional TOML file, then command-line overrides.
//! Every field is optional in the file.
//!
//! ```toml
//! difficulty = "medium"
//! mode       = "two-hands"
//! style      = "gun"
//! smoothing  = 0.4
//!
//! [sound]
//! enabled = false
//! ```

use std::fs;
use std::path::Path;

use hand_intent::cursor::{MAX_SMOOTHING, MIN_SMOOTHING};
use hand_intent::GesturePolicy;
use serde::{Deserialize, Serialize};
use tracing::warn;
use void_world::{ControlMode, Difficulty};

use crate::error::ConfigError;

pub const DEFAULT_WIN_W: usize = 1280;
pub const DEFAULT_WIN_H: usize = 720;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled:  bool,
    /// MIDI channel for melodic cues (drums always use channel 10).
    pub channel:  u8,
    pub velocity: u8,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig { enabled: true, channel: 0, velocity: 100 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub difficulty:         Difficulty,
    pub mode:               ControlMode,
    pub style:              GesturePolicy,
    /// Cursor smoothing factor, kept within 0.35–0.45.
    pub smoothing:          f32,
    /// Frames a hand may go unreported before its state is dropped.
    pub stale_after_frames: u32,
    pub countdown_secs:     f32,
    pub window_width:       usize,
    pub window_height:      usize,
    /// Whether gesture clicks operate menus (hover works regardless).
    pub hand_clicks:        bool,
    /// Simulated source frame rate.
    pub sim_rate_hz:        u32,
    /// Fixed RNG seed for reproducible spawns.
    pub seed:               Option<u64>,
    pub sound:              SoundConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            difficulty:         Difficulty::Easy,
            mode:               ControlMode::OneHand,
            style:              GesturePolicy::Pinch,
            smoothing:          MIN_SMOOTHING,
            stale_after_frames: 15,
            countdown_secs:     8.0,
            window_width:       DEFAULT_WIN_W,
            window_height:      DEFAULT_WIN_H,
            hand_clicks:        true,
            sim_rate_hz:        30,
            seed:               None,
            sound:              SoundConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Normalize soft limits and reject values the app cannot run with.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window_width, self.window_height
            )));
        }
        if !self.countdown_secs.is_finite() || self.countdown_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "countdown_secs must be a non-negative number, got {}",
                self.countdown_secs
            )));
        }
        if self.sim_rate_hz == 0 {
            return Err(ConfigError::Invalid("sim_rate_hz must be at least 1".into()));
        }

        let clamped = if self.smoothing.is_finite() {
            self.smoothing.clamp(MIN_SMOOTHING, MAX_SMOOTHING)
        } else {
            MIN_SMOOTHING
        };
        if clamped != self.smoothing {
            warn!(requested = self.smoothing, used = clamped, "smoothing out of range");
            self.smoothing = clamped;
        }
        if self.sound.channel > 15 {
            warn!(channel = self.sound.channel, "MIDI channel out of range; using 0");
            self.sound.channel = 0;
        }
        self.sound.velocity = self.sound.velocity.min(127);
        Ok(self)
    }

    pub fn countdown_ms(&self) -> u64 {
        (self.countdown_secs * 1000.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let cfg = AppConfig::from_toml_str(
            r#"
            difficulty = "hard"
            mode = "two-hands"
            style = "gun"

            [sound]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.mode, ControlMode::TwoHands);
        assert_eq!(cfg.style, GesturePolicy::Gun);
        assert!(!cfg.sound.enabled);
        assert_eq!(cfg.sound.velocity, 100);
        assert_relative_eq!(cfg.countdown_secs, 8.0);
    }

    #[test]
    fn unknown_difficulty_is_a_parse_error() {
        let err = AppConfig::from_toml_str(r#"difficulty = "insane""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn smoothing_is_clamped() {
        let cfg = AppConfig { smoothing: 0.9, ..AppConfig::default() }.validate().unwrap();
        assert_relative_eq!(cfg.smoothing, MAX_SMOOTHING);
        let cfg = AppConfig { smoothing: f32::NAN, ..AppConfig::default() }.validate().unwrap();
        assert_relative_eq!(cfg.smoothing, MIN_SMOOTHING);
        let cfg = AppConfig { smoothing: 0.4, ..AppConfig::default() }.validate().unwrap();
        assert_relative_eq!(cfg.smoothing, 0.4);
    }

    #[test]
    fn fractional_countdown_rounds_to_millis() {
        let cfg = AppConfig { countdown_secs: 2.5004, ..AppConfig::default() };
        assert_eq!(cfg.countdown_ms(), 2_500);
    }

    #[test]
    fn zero_window_rejected() {
        let err = AppConfig { window_width: 0, ..AppConfig::default() }.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
