//! FEN import and export for [`GameState`].

use super::board::Board;
use super::error::{EngineError, EngineResult};
use super::movegen::is_in_check;
use super::piece::{Color, Piece, PieceType};
use super::position::Position;
use super::state::{CastlingFlags, GameState};
use super::transition::refresh_status;
use std::collections::HashMap;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl GameState {
    /// Build a state from a FEN string.
    ///
    /// Piece `has_moved` flags are inferred: a piece counts as unmoved only
    /// on its standard starting square, and a corner rook whose castling
    /// right is absent counts as moved.
    pub fn from_fen(fen: &str) -> EngineResult<GameState> {
        let fen = fen.trim();
        if fen.is_empty() {
            return Err(EngineError::InvalidFen(
                "FEN string cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = fen.split_whitespace().collect();
        let [placement, active, castling_field, en_passant, halfmove_str, fullmove_str] =
            parts.as_slice()
        else {
            let found_count = parts.len();
            return Err(EngineError::InvalidFen(format!(
                "FEN must have exactly 6 fields, found {found_count}"
            )));
        };

        let mut board = parse_placement(placement)?;

        let current_player = match *active {
            "w" => Color::White,
            "b" => Color::Black,
            _ => {
                return Err(EngineError::InvalidFen(format!(
                    "Invalid active color '{active}' (must be 'w' or 'b')"
                )))
            }
        };

        let castling = parse_castling(castling_field)?;

        let en_passant_target = match *en_passant {
            "-" => None,
            square => {
                let pos = square
                    .parse::<Position>()
                    .map_err(|e| EngineError::InvalidFen(e.to_string()))?;
                if pos.row != 2 && pos.row != 5 {
                    return Err(EngineError::InvalidFen(format!(
                        "Invalid en passant target '{square}' (must be on rank 3 or 6)"
                    )));
                }
                Some(pos)
            }
        };

        let half_move_clock = halfmove_str.parse::<u32>().map_err(|e| {
            EngineError::InvalidFen(format!("Invalid halfmove clock '{halfmove_str}': {e}"))
        })?;
        let fullmove = fullmove_str.parse::<u32>().map_err(|e| {
            EngineError::InvalidFen(format!("Invalid fullmove number '{fullmove_str}': {e}"))
        })?;
        if fullmove == 0 {
            return Err(EngineError::InvalidFen(
                "Fullmove number must be at least 1".to_string(),
            ));
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|(_, p)| p.piece_type == PieceType::King)
                .count();
            if kings != 1 {
                return Err(EngineError::InvalidFen(format!(
                    "{color} must have exactly one king, found {kings}"
                )));
            }
        }

        infer_moved_flags(&mut board, &castling)?;

        if is_in_check(&board, current_player.opposite())? {
            return Err(EngineError::InvalidFen(format!(
                "{} is in check but it is {current_player}'s turn",
                current_player.opposite()
            )));
        }

        let initial_ply = (fullmove - 1)
            .checked_mul(2)
            .and_then(|ply| ply.checked_add(u32::from(current_player == Color::Black)))
            .ok_or_else(|| {
                EngineError::InvalidFen(format!("Fullmove number {fullmove} is too large"))
            })?;

        let mut state = GameState {
            board,
            current_player,
            selected_square: None,
            valid_moves: Vec::new(),
            move_history: Vec::new(),
            is_check: false,
            is_checkmate: false,
            is_stalemate: false,
            is_draw: false,
            game_end_reason: None,
            en_passant_target,
            castling,
            half_move_clock,
            position_history: HashMap::new(),
            initial_ply,
        };
        state.record_position();
        refresh_status(&mut state)?;
        Ok(state)
    }

    /// Current position as FEN
    pub fn to_fen(&self) -> String {
        let active = match self.current_player {
            Color::White => "w",
            Color::Black => "b",
        };
        let en_passant = self
            .en_passant_target
            .map(|pos| pos.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.placement_fen(),
            active,
            self.castling.to_fen(),
            en_passant,
            self.half_move_clock,
            self.fullmove_number()
        )
    }
}

fn parse_placement(placement: &str) -> EngineResult<Board> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        let found_ranks = ranks.len();
        return Err(EngineError::InvalidFen(format!(
            "Piece placement must have exactly 8 ranks separated by '/', found {found_ranks}"
        )));
    }

    let mut board = Board::empty();
    for (row, rank_str) in ranks.iter().enumerate() {
        let fen_rank_number = 8 - row;
        let mut col = 0usize;

        for c in rank_str.chars() {
            if let Some(empty_squares) = c.to_digit(10) {
                if empty_squares == 0 || empty_squares > 8 {
                    return Err(EngineError::InvalidFen(format!(
                        "Invalid empty square count '{c}' in rank {fen_rank_number} (must be 1-8)"
                    )));
                }
                col += empty_squares as usize;
            } else {
                if col >= 8 {
                    return Err(EngineError::InvalidFen(format!(
                        "Rank {fen_rank_number} has more than 8 squares"
                    )));
                }
                let piece = Piece::from_fen_char(c)?;
                board.set(Position::new_unchecked(row as u8, col as u8), Some(piece))?;
                col += 1;
            }

            if col > 8 {
                return Err(EngineError::InvalidFen(format!(
                    "Rank {fen_rank_number} has more than 8 squares"
                )));
            }
        }

        if col != 8 {
            return Err(EngineError::InvalidFen(format!(
                "Rank {fen_rank_number} must represent exactly 8 squares, found {col}"
            )));
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> EngineResult<CastlingFlags> {
    if field == "-" {
        return Ok(CastlingFlags {
            white_king_moved: true,
            black_king_moved: true,
            white_rook_a_moved: true,
            white_rook_h_moved: true,
            black_rook_a_moved: true,
            black_rook_h_moved: true,
        });
    }

    if let Some(c) = field.chars().find(|c| !"KQkq".contains(*c)) {
        return Err(EngineError::InvalidFen(format!(
            "Invalid character '{c}' in castling rights '{field}' (valid characters: K, Q, k, q, or '-')"
        )));
    }

    let has = |c: char| field.contains(c);
    Ok(CastlingFlags {
        white_king_moved: !has('K') && !has('Q'),
        black_king_moved: !has('k') && !has('q'),
        white_rook_a_moved: !has('Q'),
        white_rook_h_moved: !has('K'),
        black_rook_a_moved: !has('q'),
        black_rook_h_moved: !has('k'),
    })
}

fn infer_moved_flags(board: &mut Board, castling: &CastlingFlags) -> EngineResult<()> {
    let start = Board::new();
    let occupied: Vec<(Position, Piece)> = board.pieces().collect();

    for (pos, piece) in occupied {
        let at_home = start.get(pos).is_some_and(|home| home.same_kind(&piece));
        let lost_right = piece.piece_type == PieceType::Rook
            && pos.row == piece.color.back_rank()
            && (pos.col == 0 || pos.col == 7)
            && castling.rook_moved(piece.color, pos.col == 7);
        let king_lost_rights = piece.piece_type == PieceType::King && castling.king_moved(piece.color);

        if !at_home || lost_right || king_lost_rights {
            board.set(pos, Some(piece.moved()))?;
        }
    }
    Ok(())
}
