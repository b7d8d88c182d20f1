//! Score, combo and lives for one round.

pub const STARTING_LIVES:     u32 = 3;
pub const BASE_POINTS:        u32 = 100;
/// Bonus per combo step: 15 % of the base.
pub const COMBO_BONUS_POINTS: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissOutcome {
    LifeLost { lives_left: u32 },
    /// The miss that took the last life.
    GameOver,
    /// The round had already ended.
    AlreadyOver,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    score: u64,
    combo: u32,
    lives: u32,
}

impl Default for GameSession {
    fn default() -> Self { GameSession { score: 0, combo: 0, lives: STARTING_LIVES } }
}

impl GameSession {
    pub fn new() -> Self { Self::default() }

    pub fn reset(&mut self) { *self = Self::default(); }

    pub fn score(&self) -> u64 { self.score }
    pub fn combo(&self) -> u32 { self.combo }
    pub fn lives(&self) -> u32 { self.lives }
    pub fn is_over(&self) -> bool { self.lives == 0 }

    /// Award a hit and return the points it was worth:
    /// `100 × (1 + 0.15 × combo)` with the combo already incremented.
    pub fn record_hit(&mut self) -> u32 {
        self.combo += 1;
        let points = BASE_POINTS + COMBO_BONUS_POINTS * self.combo;
        self.score += u64::from(points);
        points
    }

    pub fn record_miss(&mut self) -> MissOutcome {
        self.combo = 0;
        if self.lives == 0 {
            return MissOutcome::AlreadyOver;
        }
        self.lives -= 1;
        if self.lives == 0 {
            MissOutcome::GameOver
        } else {
            MissOutcome::LifeLost { lives_left: self.lives }
        }
    }
}
