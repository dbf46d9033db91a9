//! Heuristic opponent: a level ladder, a static evaluator and a one-ply
//! move picker with deliberate imperfection.

pub use self::config::{AiLevel, AiLevelConfig, UnknownLevel};
pub use self::evaluation::{evaluate_board, game_phase, is_endgame, GamePhase};
pub use self::search::{
    candidate_moves, find_best_move, leaves_piece_hanging, selection_width, AiMove, Candidate,
};
pub use self::thinking::{get_ai_move, get_ai_move_with, AiTurn, AiTurnOutcome, ThinkingConfig};

mod config;
mod evaluation;
mod search;
mod thinking;
