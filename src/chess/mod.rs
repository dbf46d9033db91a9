// Re-export all public items
pub use self::board::Board;
pub use self::error::{EngineError, EngineResult};
pub use self::fen::STARTING_FEN;
pub use self::movegen::{
    all_legal_moves, find_king_position, has_legal_move, is_in_check, is_square_attacked,
    possible_moves, pseudo_legal_moves,
};
pub use self::moves::{Move, MoveRequest, DEFAULT_PROMOTION};
pub use self::notation::{result_token, to_pgn, PgnHeaders};
pub use self::piece::{Color, Piece, PieceType};
pub use self::position::Position;
pub use self::state::{create_initial_game_state, CastlingFlags, GameEndReason, GameState, GameStatus};
pub use self::transition::{execute_move, FIFTY_MOVE_PLIES, REPETITION_LIMIT};

// Define submodules
mod board;
mod error;
mod fen;
mod movegen;
mod moves;
mod notation;
mod piece;
mod position;
mod state;
mod transition;
