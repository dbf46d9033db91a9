pub mod ai;
pub mod chess;
pub mod cli;
pub mod config;
pub mod session;

// Re-export key types for easy testing
pub use ai::{find_best_move, get_ai_move, AiLevel, AiMove, AiTurn, AiTurnOutcome, ThinkingConfig};
pub use chess::{
    create_initial_game_state, execute_move, possible_moves, Color, EngineError, GameState, Move,
    MoveRequest, Piece, PieceType, Position,
};
pub use config::Config;
pub use session::{ClickOutcome, GameSession, SessionError};
