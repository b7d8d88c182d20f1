//! Difficulty and control-mode tables.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Spawn parameters for one difficulty.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyTuning {
    /// Minimum gap between spawns, ms.
    pub spawn_delay_ms: u64,
    pub scale:          RangeInclusive<f32>,
    /// Seconds from spawn to reaching the camera plane.
    pub travel_secs:    RangeInclusive<f32>,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn tuning(self) -> DifficultyTuning {
        match self {
            Difficulty::Easy => DifficultyTuning {
                spawn_delay_ms: 1200,
                scale:          0.6..=1.8,
                travel_secs:    1.8..=3.3,
            },
            Difficulty::Medium => DifficultyTuning {
                spawn_delay_ms: 800,
                scale:          0.4..=1.2,
                travel_secs:    1.2..=2.2,
            },
            // Tiny targets, but slower than medium so they stay reachable.
            Difficulty::Hard => DifficultyTuning {
                spawn_delay_ms: 400,
                scale:          0.12..=0.25,
                travel_secs:    1.8..=2.8,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy   => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard   => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy"   => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard"   => Ok(Difficulty::Hard),
            other    => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// One- or two-handed play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlMode {
    #[default]
    OneHand,
    TwoHands,
}

impl ControlMode {
    /// Targets created per spawn event.
    pub fn targets_per_spawn(self) -> usize {
        match self {
            ControlMode::OneHand  => 1,
            ControlMode::TwoHands => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::OneHand  => "one-hand",
            ControlMode::TwoHands => "two-hands",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ControlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-hand" | "one"   => Ok(ControlMode::OneHand),
            "two-hands" | "two"  => Ok(ControlMode::TwoHands),
            other => Err(format!("unknown mode '{other}' (expected one-hand or two-hands)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harder_spawns_faster_and_smaller() {
        let e = Difficulty::Easy.tuning();
        let h = Difficulty::Hard.tuning();
        assert!(h.spawn_delay_ms < e.spawn_delay_ms);
        assert!(h.scale.end() < e.scale.start());
    }

    #[test]
    fn parse_round_trip_names() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert_eq!("Two-Hands".parse::<ControlMode>(), Ok(ControlMode::TwoHands));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn two_hands_doubles_spawns() {
        assert_eq!(ControlMode::OneHand.targets_per_spawn(), 1);
        assert_eq!(ControlMode::TwoHands.targets_per_spawn(), 2);
    }
}
