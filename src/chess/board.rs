use super::error::{EngineError, EngineResult};
use super::piece::{Color, Piece, PieceType};
use super::position::Position;
use tracing::warn;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 8x8 grid of optional pieces, indexed `[row][col]` with row 0 = rank 8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Create a board with the standard starting position
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    /// Create a board with no pieces
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    fn setup_starting_position(&mut self) {
        for (col, &piece_type) in BACK_RANK.iter().enumerate() {
            self.squares[0][col] = Some(Piece::new(piece_type, Color::Black));
            self.squares[1][col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            self.squares[6][col] = Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[7][col] = Some(Piece::new(piece_type, Color::White));
        }
    }

    /// Get the piece at the specified position, if any
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if !pos.in_bounds() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize]
    }

    /// Set a piece at the specified position
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> EngineResult<()> {
        if !pos.in_bounds() {
            return Err(EngineError::InvalidPosition(format!(
                "Position ({},{}) is out of bounds",
                pos.row, pos.col
            )));
        }
        self.squares[pos.row as usize][pos.col as usize] = piece;
        Ok(())
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Every occupied square with its piece, row-major from a8
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all_positions().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Occupied squares belonging to `color`
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Locate the king of `color`.
    ///
    /// A missing king means the board invariant has been broken elsewhere.
    pub fn find_king(&self, color: Color) -> EngineResult<Position> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.piece_type == PieceType::King)
            .map(|(pos, _)| pos)
            .ok_or_else(|| {
                warn!("No {} king on board", color);
                EngineError::CorruptState(format!("{} king not found", color))
            })
    }

    /// Piece placement field of a FEN string
    pub fn placement_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);

        for row in self.squares.iter() {
            let mut rank_string = String::new();
            let mut empty_count = 0;

            for square in row.iter() {
                match square {
                    Some(piece) => {
                        if empty_count > 0 {
                            rank_string.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        rank_string.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }

            if empty_count > 0 {
                rank_string.push_str(&empty_count.to_string());
            }
            ranks.push(rank_string);
        }

        ranks.join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
