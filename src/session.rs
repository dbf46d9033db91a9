//! One in-memory game: the current snapshot, the click-to-move flow and the
//! AI seat. Every change of position bumps a generation counter so AI
//! results computed for an older position are thrown away.

use crate::ai::{get_ai_move_with, AiLevel, AiTurn, AiTurnOutcome, ThinkingConfig};
use crate::chess::{
    execute_move, possible_moves, Color, EngineError, GameState, Move, MoveRequest, PieceType,
    Position,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("It is not {0}'s turn")]
    NotYourTurn(Color),

    #[error("No promotion is pending")]
    NoPendingPromotion,

    #[error("No AI opponent is configured")]
    NoAiOpponent,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// What a click on the board did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A piece was selected; its legal destinations are cached on the state
    Selected {
        square: Position,
        valid_moves: Vec<Position>,
    },
    Deselected,
    Moved(Move),
    /// The move needs a promotion choice; finish it with [`GameSession::promote`]
    PromotionRequired { from: Position, to: Position },
    Ignored,
}

/// The AI's side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSeat {
    pub level: AiLevel,
    pub color: Color,
}

#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    generation: u64,
    ai: Option<AiSeat>,
    thinking: ThinkingConfig,
    pending_promotion: Option<(Position, Position)>,
}

impl GameSession {
    /// Two humans at one board
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            generation: 0,
            ai: None,
            thinking: ThinkingConfig::default(),
            pending_promotion: None,
        }
    }

    /// Human against the AI playing `color`
    pub fn against_ai(level: AiLevel, color: Color, thinking: ThinkingConfig) -> Self {
        Self {
            ai: Some(AiSeat { level, color }),
            thinking,
            ..Self::new()
        }
    }

    /// Resume from an existing state
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            ..Self::new()
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ai_seat(&self) -> Option<AiSeat> {
        self.ai
    }

    pub fn set_ai(&mut self, seat: Option<AiSeat>) {
        self.ai = seat;
        self.generation += 1;
    }

    pub fn pending_promotion(&self) -> Option<(Position, Position)> {
        self.pending_promotion
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.state.is_game_over()
            && self.ai.is_some_and(|seat| seat.color == self.state.current_player)
    }

    fn advance(&mut self, next: GameState) {
        self.state = next;
        self.generation += 1;
        self.pending_promotion = None;
        if let Some(reason) = self.state.end_reason() {
            info!("Game finished: {}", reason);
        }
    }

    fn last_move(&self) -> SessionResult<Move> {
        self.state
            .last_move()
            .cloned()
            .ok_or_else(|| EngineError::CorruptState("move history is empty after a move".to_string()).into())
    }

    /// Discard the current game and start from the initial position.
    /// Any AI decision in flight becomes stale.
    pub fn new_game(&mut self) {
        info!("Starting a new game");
        self.advance(GameState::new());
    }

    /// Replace the position, e.g. with one imported from FEN
    pub fn load(&mut self, state: GameState) {
        info!("Loading position {}", state.to_fen());
        self.advance(state);
    }

    pub fn set_thinking(&mut self, thinking: ThinkingConfig) {
        self.thinking = thinking;
    }

    /// Handle a click on `square`, mirroring the select-then-confirm flow
    pub fn click(&mut self, square: Position) -> SessionResult<ClickOutcome> {
        if self.state.is_game_over() || self.is_ai_turn() {
            return Ok(ClickOutcome::Ignored);
        }

        let mover = self.state.current_player;
        let own_piece = self.state.board.get(square).filter(|p| p.color == mover);

        if let Some(selected) = self.state.selected_square {
            if selected == square {
                self.set_selection(None, Vec::new());
                return Ok(ClickOutcome::Deselected);
            }

            if self.state.valid_moves.contains(&square) {
                let promoting = self.state.board.get(selected).is_some_and(|p| {
                    p.piece_type == PieceType::Pawn && square.row == mover.promotion_rank()
                });
                if promoting {
                    self.pending_promotion = Some((selected, square));
                    return Ok(ClickOutcome::PromotionRequired {
                        from: selected,
                        to: square,
                    });
                }
                let mv = self.play(MoveRequest::new_unchecked(selected, square, None))?;
                return Ok(ClickOutcome::Moved(mv));
            }
        }

        match own_piece {
            Some(_) => {
                let valid_moves = possible_moves(&self.state.board, square, &self.state)?;
                self.set_selection(Some(square), valid_moves.clone());
                Ok(ClickOutcome::Selected {
                    square,
                    valid_moves,
                })
            }
            None if self.state.selected_square.is_some() => {
                self.set_selection(None, Vec::new());
                Ok(ClickOutcome::Deselected)
            }
            None => Ok(ClickOutcome::Ignored),
        }
    }

    pub fn clear_selection(&mut self) {
        if self.state.selected_square.is_some() {
            self.set_selection(None, Vec::new());
        }
        self.pending_promotion = None;
    }

    fn set_selection(&mut self, square: Option<Position>, valid_moves: Vec<Position>) {
        self.state = GameState {
            selected_square: square,
            valid_moves,
            ..self.state.clone()
        };
    }

    /// Complete a pending promotion with the chosen piece
    pub fn promote(&mut self, piece_type: PieceType) -> SessionResult<Move> {
        let (from, to) = self
            .pending_promotion
            .ok_or(SessionError::NoPendingPromotion)?;
        self.play(MoveRequest::new(from, to, Some(piece_type))?)
    }

    /// Play a move for the side to move
    pub fn play(&mut self, request: MoveRequest) -> SessionResult<Move> {
        let next = execute_move(
            &self.state,
            request.from,
            request.to,
            request.promotion_piece,
        )?;
        self.advance(next);
        self.last_move()
    }

    /// Play a move typed by a human, refusing it on the AI's turn
    pub fn play_human(&mut self, request: MoveRequest) -> SessionResult<Move> {
        if self.is_ai_turn() {
            return Err(SessionError::NotYourTurn(self.state.current_player));
        }
        self.play(request)
    }

    pub fn resign(&mut self, color: Color) {
        let next = self.state.resign(color);
        self.advance(next);
    }

    /// Draw offers are accepted on the spot
    pub fn offer_draw(&mut self) {
        let next = self.state.agree_draw();
        self.advance(next);
    }

    pub fn flag_timeout(&mut self, color: Color) {
        let next = self.state.flag_timeout(color);
        self.advance(next);
    }

    /// Start the AI thinking in the background. Feed the outcome back
    /// through [`GameSession::apply_ai_turn`].
    pub fn start_ai_turn(&self) -> SessionResult<AiTurn> {
        let seat = self.ai.ok_or(SessionError::NoAiOpponent)?;
        if !self.is_ai_turn() {
            return Err(SessionError::NotYourTurn(seat.color));
        }
        Ok(AiTurn::spawn(
            self.state.clone(),
            seat.level,
            seat.color,
            self.thinking.clone(),
            self.generation,
        ))
    }

    /// Apply a finished AI decision, unless the game moved on meanwhile.
    ///
    /// Returns `Ok(None)` for cancelled, stale or empty decisions.
    pub fn apply_ai_turn(&mut self, outcome: AiTurnOutcome) -> SessionResult<Option<Move>> {
        let (generation, result) = match outcome {
            AiTurnOutcome::Cancelled => {
                debug!("AI turn was cancelled");
                return Ok(None);
            }
            AiTurnOutcome::Ready { generation, result } => (generation, result),
        };

        if generation != self.generation || !self.is_ai_turn() {
            info!(
                "Discarding stale AI move (computed for generation {}, now {})",
                generation, self.generation
            );
            return Ok(None);
        }

        match result? {
            Some(request) => self.play(request).map(Some),
            None => Ok(None),
        }
    }

    /// Think and play the AI's move in one step. Dropping the future before
    /// it completes leaves the session untouched.
    pub async fn play_ai_turn(&mut self) -> SessionResult<Option<Move>> {
        let seat = self.ai.ok_or(SessionError::NoAiOpponent)?;
        if !self.is_ai_turn() {
            return Err(SessionError::NotYourTurn(seat.color));
        }
        let decision = get_ai_move_with(&self.state, seat.level, seat.color, &self.thinking).await?;
        match decision {
            Some(request) => self.play(request).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
