use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Skill ladder, named by approximate rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AiLevel {
    Beginner,
    Amateur,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown AI level {0} (expected one of 400, 800, 1200, 1600, 2000, 2500)")]
pub struct UnknownLevel(pub String);

/// Tuning knobs for one level. Pure data; nothing here changes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct AiLevelConfig {
    pub name: &'static str,
    pub elo: u16,
    pub description: &'static str,
    /// Chance of deliberately playing a bad move
    pub blunder_probability: f64,
    /// Nominal look-ahead. Informational only: every level searches one ply.
    pub tactical_depth: u8,
    /// Scales piece-square bonuses and the hanging-piece penalty (0-1)
    pub strategic_weight: f64,
    /// Scales the random perturbation added to move scores (0-1)
    pub randomness: f64,
    pub development_weight: f64,
    pub center_control_weight: f64,
    pub king_safety_weight: f64,
    /// Fraction of ranked moves the final pick is drawn from
    pub selection_slice: f64,
    /// Chance of taking the single best move instead of sampling the slice
    pub best_move_bias: f64,
    /// Base thinking delay in milliseconds
    pub base_think_ms: u64,
}

static LEVELS: [AiLevelConfig; 6] = [
    AiLevelConfig {
        name: "Beginner",
        elo: 400,
        description: "Knows the rules but sees very little",
        blunder_probability: 0.35,
        tactical_depth: 1,
        strategic_weight: 0.05,
        randomness: 0.7,
        development_weight: 0.1,
        center_control_weight: 0.2,
        king_safety_weight: 0.3,
        selection_slice: 0.6,
        best_move_bias: 0.0,
        base_think_ms: 250,
    },
    AiLevelConfig {
        name: "Amateur",
        elo: 800,
        description: "Applies the basic principles",
        blunder_probability: 0.25,
        tactical_depth: 2,
        strategic_weight: 0.3,
        randomness: 0.4,
        development_weight: 0.5,
        center_control_weight: 0.6,
        king_safety_weight: 0.65,
        selection_slice: 0.4,
        best_move_bias: 0.0,
        base_think_ms: 400,
    },
    AiLevelConfig {
        name: "Intermediate",
        elo: 1200,
        description: "Has a plan but executes it loosely",
        blunder_probability: 0.12,
        tactical_depth: 3,
        strategic_weight: 0.6,
        randomness: 0.2,
        development_weight: 0.75,
        center_control_weight: 0.8,
        king_safety_weight: 0.85,
        selection_slice: 0.25,
        best_move_bias: 0.0,
        base_think_ms: 650,
    },
    AiLevelConfig {
        name: "Advanced",
        elo: 1600,
        description: "Tactically solid",
        blunder_probability: 0.05,
        tactical_depth: 4,
        strategic_weight: 0.85,
        randomness: 0.08,
        development_weight: 0.95,
        center_control_weight: 0.95,
        king_safety_weight: 0.98,
        selection_slice: 0.15,
        best_move_bias: 0.0,
        base_think_ms: 900,
    },
    AiLevelConfig {
        name: "Expert",
        elo: 2000,
        description: "Good positional understanding",
        blunder_probability: 0.02,
        tactical_depth: 5,
        strategic_weight: 1.0,
        randomness: 0.03,
        development_weight: 1.0,
        center_control_weight: 1.0,
        king_safety_weight: 1.0,
        selection_slice: 0.10,
        best_move_bias: 0.0,
        base_think_ms: 1200,
    },
    AiLevelConfig {
        name: "Master",
        elo: 2500,
        description: "Nearly always plays its best move",
        blunder_probability: 0.005,
        tactical_depth: 6,
        strategic_weight: 1.0,
        randomness: 0.01,
        development_weight: 1.0,
        center_control_weight: 1.0,
        king_safety_weight: 1.0,
        selection_slice: 0.05,
        best_move_bias: 0.8,
        base_think_ms: 1800,
    },
];

impl AiLevel {
    pub const ALL: [AiLevel; 6] = [
        AiLevel::Beginner,
        AiLevel::Amateur,
        AiLevel::Intermediate,
        AiLevel::Advanced,
        AiLevel::Expert,
        AiLevel::Master,
    ];

    pub fn config(&self) -> &'static AiLevelConfig {
        &LEVELS[*self as usize]
    }

    pub fn elo(&self) -> u16 {
        self.config().elo
    }
}

impl Default for AiLevel {
    fn default() -> Self {
        AiLevel::Intermediate
    }
}

impl TryFrom<u16> for AiLevel {
    type Error = UnknownLevel;

    fn try_from(elo: u16) -> Result<Self, Self::Error> {
        AiLevel::ALL
            .into_iter()
            .find(|level| level.elo() == elo)
            .ok_or_else(|| UnknownLevel(elo.to_string()))
    }
}

impl From<AiLevel> for u16 {
    fn from(level: AiLevel) -> Self {
        level.elo()
    }
}

impl FromStr for AiLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(elo) = trimmed.parse::<u16>() {
            return AiLevel::try_from(elo);
        }
        AiLevel::ALL
            .into_iter()
            .find(|level| level.config().name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for AiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config();
        write!(f, "{} ({})", config.name, config.elo)
    }
}
