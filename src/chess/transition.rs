//! The state transition: the only way a game moves forward.

use super::board::Board;
use super::error::{EngineError, EngineResult};
use super::movegen::{has_legal_move, is_in_check, possible_moves};
use super::moves::{Move, DEFAULT_PROMOTION};
use super::notation::san_for;
use super::piece::{Piece, PieceType};
use super::position::Position;
use super::state::{GameEndReason, GameState};
use tracing::{debug, info};

/// Plies without capture or pawn move after which the game is drawn
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Occurrences of one position that draw the game
pub const REPETITION_LIMIT: u32 = 3;

/// Result of playing a move on a bare board
#[derive(Debug, Clone)]
pub(crate) struct BoardOutcome {
    pub board: Board,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castling: bool,
    pub promotion: Option<PieceType>,
}

/// Play `from -> to` on a copy of `board`, handling en passant removal,
/// the castling rook hop and promotion. No legality checks beyond the source
/// square being occupied.
pub(crate) fn apply_to_board(
    board: &Board,
    from: Position,
    to: Position,
    promotion: Option<PieceType>,
    en_passant_target: Option<Position>,
) -> EngineResult<BoardOutcome> {
    let piece = board
        .get(from)
        .ok_or_else(|| EngineError::InvalidMove(format!("No piece at source position {from}")))?;

    let mut next = board.clone();
    let mut captured = board.get(to);

    let is_en_passant = piece.piece_type == PieceType::Pawn
        && Some(to) == en_passant_target
        && from.col != to.col
        && captured.is_none();
    if is_en_passant {
        let passed = Position::new_unchecked(from.row, to.col);
        captured = next.get(passed);
        next.set(passed, None)?;
    }

    let is_castling = piece.piece_type == PieceType::King && from.col.abs_diff(to.col) == 2;
    if is_castling {
        let (rook_from_col, rook_to_col) = if to.col > from.col { (7, 5) } else { (0, 3) };
        let rook_from = Position::new_unchecked(from.row, rook_from_col);
        let rook_to = Position::new_unchecked(from.row, rook_to_col);
        let rook = next
            .get(rook_from)
            .ok_or_else(|| EngineError::InvalidMove(format!("No rook found at {rook_from} for castling")))?;
        next.set(rook_from, None)?;
        next.set(rook_to, Some(rook.moved()))?;
    }

    let promotion = if piece.piece_type == PieceType::Pawn && to.row == piece.color.promotion_rank() {
        Some(promotion.unwrap_or(DEFAULT_PROMOTION))
    } else {
        None
    };
    let placed = match promotion {
        Some(piece_type) => Piece::new(piece_type, piece.color).moved(),
        None => piece.moved(),
    };

    next.set(from, None)?;
    next.set(to, Some(placed))?;

    Ok(BoardOutcome {
        board: next,
        piece,
        captured,
        is_en_passant,
        is_castling,
        promotion,
    })
}

/// Apply a move and return the next state.
///
/// The move must be legal for the side to move; anything else is rejected
/// with [`EngineError::InvalidMove`], and moving after the game has ended
/// with [`EngineError::GameOver`]. A pawn reaching the last rank becomes
/// `promotion_piece`, or [`DEFAULT_PROMOTION`] when none is given.
pub fn execute_move(
    state: &GameState,
    from: Position,
    to: Position,
    promotion_piece: Option<PieceType>,
) -> EngineResult<GameState> {
    if let Some(reason) = state.end_reason() {
        return Err(EngineError::GameOver(reason));
    }
    if !from.in_bounds() || !to.in_bounds() {
        return Err(EngineError::InvalidMove(format!(
            "Move ({},{}) -> ({},{}) is out of bounds",
            from.row, from.col, to.row, to.col
        )));
    }

    let piece = state
        .board
        .get(from)
        .ok_or_else(|| EngineError::InvalidMove(format!("No piece at source position {from}")))?;
    if piece.color != state.current_player {
        return Err(EngineError::InvalidMove(format!(
            "Cannot move {} piece when it's {}'s turn",
            piece.color, state.current_player
        )));
    }
    if let Some(choice) = promotion_piece {
        if !choice.is_promotion_target() {
            return Err(EngineError::InvalidMove(format!("Cannot promote to {choice}")));
        }
        if piece.piece_type != PieceType::Pawn || to.row != piece.color.promotion_rank() {
            return Err(EngineError::InvalidMove(
                "Promotion piece given for a move that does not promote".to_string(),
            ));
        }
    }
    if !possible_moves(&state.board, from, state)?.contains(&to) {
        return Err(EngineError::InvalidMove(format!(
            "{} {} cannot move from {from} to {to}",
            piece.color, piece.piece_type
        )));
    }

    let outcome = apply_to_board(&state.board, from, to, promotion_piece, state.en_passant_target)?;
    let mover = piece.color;

    let mut castling = state.castling;
    match piece.piece_type {
        PieceType::King => castling.mark_king_moved(mover),
        PieceType::Rook => castling.mark_rook_square(from),
        _ => {}
    }
    if outcome.captured.is_some_and(|p| p.piece_type == PieceType::Rook) {
        castling.mark_rook_square(to);
    }

    let en_passant_target = if piece.piece_type == PieceType::Pawn && from.row.abs_diff(to.row) == 2 {
        Some(Position::new_unchecked((from.row + to.row) / 2, from.col))
    } else {
        None
    };

    let half_move_clock = if piece.piece_type == PieceType::Pawn || outcome.captured.is_some() {
        0
    } else {
        state.half_move_clock + 1
    };

    let mut next = GameState {
        board: outcome.board.clone(),
        current_player: mover.opposite(),
        selected_square: None,
        valid_moves: Vec::new(),
        move_history: state.move_history.clone(),
        is_check: false,
        is_checkmate: false,
        is_stalemate: false,
        is_draw: false,
        game_end_reason: None,
        en_passant_target,
        castling,
        half_move_clock,
        position_history: state.position_history.clone(),
        initial_ply: state.initial_ply,
    };
    next.record_position();
    refresh_status(&mut next)?;

    let san = san_for(state, from, to, &outcome, &next)?;
    debug!("{} plays {}", mover, san);
    next.move_history.push(Move {
        from,
        to,
        piece,
        captured_piece: outcome.captured,
        is_en_passant: outcome.is_en_passant,
        is_castling: outcome.is_castling,
        is_promotion: outcome.promotion.is_some(),
        promotion_piece: outcome.promotion,
        san,
    });

    if let Some(reason) = next.game_end_reason {
        info!("Game over after {}: {}", next.ply(), reason);
    }

    Ok(next)
}

/// Recompute check and terminal flags for the side to move.
///
/// Expects the current position to already be counted in
/// `position_history`.
pub(crate) fn refresh_status(state: &mut GameState) -> EngineResult<()> {
    let side = state.current_player;
    state.is_check = is_in_check(&state.board, side)?;
    let can_move = has_legal_move(state, side)?;

    state.is_checkmate = state.is_check && !can_move;
    state.is_stalemate = !state.is_check && !can_move;
    state.game_end_reason = if state.is_checkmate {
        Some(GameEndReason::Checkmate)
    } else if state.is_stalemate {
        Some(GameEndReason::Stalemate)
    } else if state.half_move_clock >= FIFTY_MOVE_PLIES {
        Some(GameEndReason::FiftyMoveRule)
    } else if state.repetition_count() >= REPETITION_LIMIT {
        Some(GameEndReason::ThreefoldRepetition)
    } else {
        None
    };
    state.is_draw = matches!(
        state.game_end_reason,
        Some(GameEndReason::FiftyMoveRule | GameEndReason::ThreefoldRepetition)
    );
    Ok(())
}
