//! Move legality: pseudo-legal generation per piece, attack detection and
//! filtering down to moves that keep the mover's king safe.

use super::board::Board;
use super::error::EngineResult;
use super::piece::{Color, Piece, PieceType};
use super::position::Position;
use super::state::GameState;
use super::transition::apply_to_board;
use tracing::trace;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Destinations the piece on `from` can reach by its movement pattern,
/// without checking whether the mover's own king is left in check.
///
/// Castling is included here and carries its own attack conditions.
pub fn pseudo_legal_moves(board: &Board, from: Position, state: &GameState) -> Vec<Position> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, from, piece, state.en_passant_target, &mut moves),
        PieceType::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceType::Bishop => slide_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceType::Rook => slide_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceType::Queen => {
            slide_moves(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
            slide_moves(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
        }
        PieceType::King => {
            step_moves(board, from, piece.color, &KING_OFFSETS, &mut moves);
            castling_moves(board, from, piece, state, &mut moves);
        }
    }
    moves
}

/// Legal destinations for the piece on `from`: pseudo-legal moves that do
/// not leave its own king attacked once played.
pub fn possible_moves(board: &Board, from: Position, state: &GameState) -> EngineResult<Vec<Position>> {
    let Some(piece) = board.get(from) else {
        return Ok(Vec::new());
    };

    let mut legal = Vec::new();
    for to in pseudo_legal_moves(board, from, state) {
        let outcome = apply_to_board(board, from, to, None, state.en_passant_target)?;
        if !is_in_check(&outcome.board, piece.color)? {
            legal.push(to);
        }
    }
    trace!("{} {} at {}: {} legal moves", piece.color, piece.piece_type, from, legal.len());
    Ok(legal)
}

/// Every legal `(from, to)` pair for `color` on the state's board
pub fn all_legal_moves(state: &GameState, color: Color) -> EngineResult<Vec<(Position, Position)>> {
    let mut moves = Vec::new();
    for (from, _) in state.board.pieces_of(color) {
        for to in possible_moves(&state.board, from, state)? {
            moves.push((from, to));
        }
    }
    Ok(moves)
}

/// Whether `color` has at least one legal move; stops at the first found
pub fn has_legal_move(state: &GameState, color: Color) -> EngineResult<bool> {
    for (from, _) in state.board.pieces_of(color) {
        if !possible_moves(&state.board, from, state)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// True iff some piece of the opposing color attacks `color`'s king
pub fn is_in_check(board: &Board, color: Color) -> EngineResult<bool> {
    let king = board.find_king(color)?;
    Ok(is_square_attacked(board, king, color.opposite()))
}

/// Locate `color`'s king; a missing king is a corrupted board
pub fn find_king_position(board: &Board, color: Color) -> EngineResult<Position> {
    board.find_king(color)
}

/// Whether any piece of color `by` attacks `square`.
///
/// Pawns attack diagonally whether or not the square is occupied, and kings
/// never attack through castling, so this never recurses into move generation.
pub fn is_square_attacked(board: &Board, square: Position, by: Color) -> bool {
    let holds = |pos: Option<Position>, types: &[PieceType]| {
        pos.and_then(|p| board.get(p))
            .is_some_and(|piece| piece.color == by && types.contains(&piece.piece_type))
    };

    // a pawn of `by` attacks from one row behind its forward direction
    let pawn_row = -by.forward();
    if holds(square.offset(pawn_row, -1), &[PieceType::Pawn])
        || holds(square.offset(pawn_row, 1), &[PieceType::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[PieceType::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[PieceType::King]))
    {
        return true;
    }

    let ray_hits = |directions: &[(i8, i8)], sliders: &[PieceType]| {
        directions.iter().any(|&(dr, dc)| {
            let mut current = square.offset(dr, dc);
            while let Some(pos) = current {
                if let Some(piece) = board.get(pos) {
                    return piece.color == by && sliders.contains(&piece.piece_type);
                }
                current = pos.offset(dr, dc);
            }
            false
        })
    };

    ray_hits(&ROOK_DIRECTIONS, &[PieceType::Rook, PieceType::Queen])
        || ray_hits(&BISHOP_DIRECTIONS, &[PieceType::Bishop, PieceType::Queen])
}

fn pawn_moves(
    board: &Board,
    from: Position,
    pawn: Piece,
    en_passant_target: Option<Position>,
    moves: &mut Vec<Position>,
) {
    let forward = pawn.color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if board.is_empty_at(one) {
            moves.push(one);

            if !pawn.has_moved && from.row == pawn.color.pawn_rank() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.is_empty_at(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(target) = from.offset(forward, d_col) else {
            continue;
        };
        match board.get(target) {
            Some(victim) if victim.color != pawn.color => moves.push(target),
            Some(_) => {}
            None if en_passant_target == Some(target) => {
                // the passed pawn sits beside us, on our row
                let passed = Position::new_unchecked(from.row, target.col);
                let is_enemy_pawn = board.get(passed).is_some_and(|p| {
                    p.piece_type == PieceType::Pawn && p.color != pawn.color
                });
                if is_enemy_pawn {
                    moves.push(target);
                }
            }
            None => {}
        }
    }
}

fn step_moves(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Position>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            match board.get(to) {
                Some(piece) if piece.color == color => {}
                _ => moves.push(to),
            }
        }
    }
}

fn slide_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Position>,
) {
    for &(dr, dc) in directions {
        let mut current = from.offset(dr, dc);
        while let Some(to) = current {
            match board.get(to) {
                None => moves.push(to),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to.offset(dr, dc);
        }
    }
}

fn castling_moves(
    board: &Board,
    from: Position,
    king: Piece,
    state: &GameState,
    moves: &mut Vec<Position>,
) {
    let color = king.color;
    let home = Position::new_unchecked(color.back_rank(), 4);
    if from != home || king.has_moved || state.castling.king_moved(color) {
        return;
    }

    let enemy = color.opposite();
    if is_square_attacked(board, from, enemy) {
        return;
    }

    for kingside in [true, false] {
        if state.castling.rook_moved(color, kingside) {
            continue;
        }

        let rook_col = if kingside { 7 } else { 0 };
        let rook_square = Position::new_unchecked(home.row, rook_col);
        let rook_ready = board.get(rook_square).is_some_and(|rook| {
            rook.piece_type == PieceType::Rook && rook.color == color && !rook.has_moved
        });
        if !rook_ready {
            continue;
        }

        let (low, high) = if kingside { (5, 6) } else { (1, 3) };
        let path_clear = (low..=high).all(|col| board.is_empty_at(Position::new_unchecked(home.row, col)));
        if !path_clear {
            continue;
        }

        let step: i8 = if kingside { 1 } else { -1 };
        let crossing = Position::new_unchecked(home.row, (4 + step) as u8);
        let landing = Position::new_unchecked(home.row, (4 + 2 * step) as u8);
        if is_square_attacked(board, crossing, enemy) || is_square_attacked(board, landing, enemy) {
            continue;
        }

        moves.push(landing);
    }
}
