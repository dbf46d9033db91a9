//! One-ply move selection. Each legal move is played once and the resulting
//! position scored; there is no look-ahead at the opponent's reply.

use super::config::AiLevelConfig;
use super::evaluation::{evaluate_board, OPENING_PLIES};
use crate::chess::{
    all_legal_moves, execute_move, possible_moves, Color, EngineError, EngineResult, GameState,
    MoveRequest, Piece, PieceType, Position,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Move chosen by the AI
pub type AiMove = MoveRequest;

const CAPTURE_BONUS_RATE: f64 = 0.15;
const CHECKMATE_BONUS: f64 = 100_000.0;
const DEVELOPMENT_MOVE_BONUS: f64 = 20.0;
const CASTLING_BONUS: f64 = 40.0;
const NOISE_RANGE: f64 = 150.0;

/// A legal move for the AI's side, with the piece that makes it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
}

impl Candidate {
    fn into_move(self) -> AiMove {
        MoveRequest::new_unchecked(self.from, self.to, None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredMove {
    pub candidate: Candidate,
    pub score: f64,
}

/// All legal moves for `color`, in board order
pub fn candidate_moves(state: &GameState, color: Color) -> EngineResult<Vec<Candidate>> {
    let moves = all_legal_moves(state, color)?;
    Ok(moves
        .into_iter()
        .filter_map(|(from, to)| state.board.get(from).map(|piece| Candidate { from, to, piece }))
        .collect())
}

/// Whether the piece arriving on `to` can be taken straight back
pub fn leaves_piece_hanging(
    state: &GameState,
    from: Position,
    to: Position,
    ai_color: Color,
) -> EngineResult<bool> {
    let after = execute_move(state, from, to, None)?;
    if after.board.get(to).is_none() {
        return Ok(false);
    }

    for (square, _) in after.board.pieces_of(ai_color.opposite()) {
        if possible_moves(&after.board, square, &after)?.contains(&to) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Pick a move for `ai_color`, or `None` when it has no legal move.
///
/// Randomness only enters through `rng`: blunder rolls, score noise and the
/// final pick from the top slice of ranked moves.
pub fn find_best_move<R: Rng>(
    state: &GameState,
    ai_color: Color,
    config: &AiLevelConfig,
    rng: &mut R,
) -> EngineResult<Option<AiMove>> {
    if state.current_player != ai_color {
        return Err(EngineError::InvalidMove(format!(
            "AI plays {ai_color} but it is {}'s turn",
            state.current_player
        )));
    }

    let candidates = candidate_moves(state, ai_color)?;
    if candidates.is_empty() {
        return Ok(None);
    }

    if rng.gen::<f64>() < config.blunder_probability {
        if let Some(blunder) = pick_blunder(state, &candidates, ai_color, config, rng)? {
            debug!("{} blunders with {}", config.name, blunder);
            return Ok(Some(blunder));
        }
    }

    let mut scored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let score = score_move(state, candidate, ai_color, config, rng)?;
        scored.push(ScoredMove { candidate, score });
    }
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let slice_len = selection_width(scored.len(), config);
    let top = &scored[..slice_len];
    let picked = if config.best_move_bias > 0.0 && rng.gen_bool(config.best_move_bias) {
        top[0]
    } else {
        top[rng.gen_range(0..top.len())]
    };

    let mut chosen = picked.candidate.into_move();
    if picked.candidate.piece.piece_type == PieceType::Pawn
        && picked.candidate.to.row == ai_color.promotion_rank()
    {
        chosen.promotion_piece = Some(choose_promotion(config, rng));
    }

    debug!(
        "{} picks {} (score {:.1}, best {:.1}, {} candidates, slice {})",
        config.name,
        chosen,
        picked.score,
        scored[0].score,
        scored.len(),
        slice_len
    );
    Ok(Some(chosen))
}

/// How many of the best-ranked moves the final pick is drawn from.
/// Never zero, so a small candidate list still yields its best move.
pub fn selection_width(candidates: usize, config: &AiLevelConfig) -> usize {
    ((candidates as f64 * config.selection_slice).floor() as usize).clamp(1, candidates.max(1))
}

/// A deliberately poor move. The two lowest levels hunt for the move that
/// hangs the most valuable piece; stronger levels settle for something from
/// the weaker half of the statically ranked moves.
fn pick_blunder<R: Rng>(
    state: &GameState,
    candidates: &[Candidate],
    ai_color: Color,
    config: &AiLevelConfig,
    rng: &mut R,
) -> EngineResult<Option<AiMove>> {
    if config.elo <= 800 {
        let mut worst: Option<Candidate> = None;
        for &candidate in candidates {
            if leaves_piece_hanging(state, candidate.from, candidate.to, ai_color)? {
                let worse = worst.map_or(true, |w| {
                    candidate.piece.piece_type.value() > w.piece.piece_type.value()
                });
                if worse {
                    worst = Some(candidate);
                }
            }
        }
        let pick = match worst {
            Some(candidate) => candidate,
            None => *candidates
                .choose(rng)
                .ok_or_else(|| EngineError::InvalidMove("no candidate moves".to_string()))?,
        };
        return Ok(Some(pick.into_move()));
    }

    let mut ranked = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        let after = execute_move(state, candidate.from, candidate.to, None)?;
        ranked.push(ScoredMove {
            candidate,
            score: evaluate_board(&after, ai_color, config),
        });
    }
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let weak_half = &ranked[ranked.len() / 2..];
    Ok(weak_half.choose(rng).map(|m| m.candidate.into_move()))
}

/// Heuristic score of one candidate, noise included
pub fn score_move<R: Rng>(
    state: &GameState,
    candidate: Candidate,
    ai_color: Color,
    config: &AiLevelConfig,
    rng: &mut R,
) -> EngineResult<f64> {
    let after = execute_move(state, candidate.from, candidate.to, None)?;
    let mut score = evaluate_board(&after, ai_color, config);

    if let Some(captured) = after.last_move().and_then(|m| m.captured_piece) {
        let bonus = captured.piece_type.value() as f64 * CAPTURE_BONUS_RATE;
        score += bonus;
        // weak players overvalue grabbing material
        if config.elo < 1200 {
            score += bonus * 0.5;
        }
    }

    if after.is_check {
        score += if config.elo < 1200 { 50.0 } else { 30.0 };
    }
    if after.is_checkmate {
        score += CHECKMATE_BONUS;
    }

    if leaves_piece_hanging(state, candidate.from, candidate.to, ai_color)? {
        let penalty = candidate.piece.piece_type.value() as f64 * config.strategic_weight;
        let overlooked = config.elo < 800 && rng.gen_bool(0.5);
        if !overlooked {
            score -= penalty;
        }
    }

    let developing = matches!(candidate.piece.piece_type, PieceType::Knight | PieceType::Bishop)
        && !candidate.piece.has_moved;
    if state.ply() < OPENING_PLIES && developing {
        score += DEVELOPMENT_MOVE_BONUS * config.development_weight;
    }

    if candidate.piece.piece_type == PieceType::King && candidate.from.col.abs_diff(candidate.to.col) == 2 {
        score += CASTLING_BONUS * config.king_safety_weight;
    }

    if config.randomness > 0.0 {
        score += (rng.gen::<f64>() - 0.5) * NOISE_RANGE * config.randomness;
    }

    Ok(score)
}

fn choose_promotion<R: Rng>(config: &AiLevelConfig, rng: &mut R) -> PieceType {
    if config.elo < 1200 || rng.gen::<f64>() > 0.1 {
        return PieceType::Queen;
    }
    *[PieceType::Queen, PieceType::Rook, PieceType::Knight]
        .choose(rng)
        .unwrap_or(&PieceType::Queen)
}
