//! Paced AI decisions. The move is only computed after an artificial
//! "thinking" delay so it never lands in the same tick that asked for it.

use super::config::AiLevel;
use super::evaluation::{game_phase, GamePhase};
use super::search::{find_best_move, AiMove};
use crate::chess::{Color, EngineError, EngineResult, GameState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const OPENING_PACE: f64 = 0.7;
const ENDGAME_PACE: f64 = 1.3;
/// Total jitter width as a fraction of the base delay (±40%)
const JITTER: f64 = 0.8;

/// How long the AI pretends to think
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkingConfig {
    /// When false the AI answers after a single scheduler yield
    pub enabled: bool,
    /// Multiplier applied to every delay
    pub scale: f64,
    /// Floor applied before scaling
    pub min_delay_ms: u64,
}

impl Default for ThinkingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.0,
            min_delay_ms: 200,
        }
    }
}

impl ThinkingConfig {
    /// No artificial delay; useful for tests and self-play
    pub fn instant() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay for `level` in this position: the level's base time, paced by
    /// game phase, jittered, floored at `min_delay_ms` and then scaled.
    pub fn delay_for<R: Rng>(&self, state: &GameState, level: AiLevel, rng: &mut R) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }

        let mut base = level.config().base_think_ms as f64;
        match game_phase(state) {
            GamePhase::Opening => base *= OPENING_PACE,
            GamePhase::Endgame => base *= ENDGAME_PACE,
            GamePhase::Middlegame => {}
        }

        let jittered = base + (rng.gen::<f64>() - 0.5) * base * JITTER;
        let floored = jittered.max(self.min_delay_ms as f64);
        Duration::try_from_secs_f64((floored * self.scale.max(0.0)) / 1000.0)
            .unwrap_or_else(|_| Duration::from_millis(self.min_delay_ms))
    }
}

/// Decide a move for `ai_color` after the default thinking delay
pub async fn get_ai_move(
    state: &GameState,
    level: AiLevel,
    ai_color: Color,
) -> EngineResult<Option<AiMove>> {
    get_ai_move_with(state, level, ai_color, &ThinkingConfig::default()).await
}

/// Decide a move for `ai_color` after the delay described by `thinking`.
///
/// Dropping the returned future before it resolves abandons the decision;
/// nothing is applied to any state.
pub async fn get_ai_move_with(
    state: &GameState,
    level: AiLevel,
    ai_color: Color,
    thinking: &ThinkingConfig,
) -> EngineResult<Option<AiMove>> {
    let delay = thinking.delay_for(state, level, &mut rand::thread_rng());
    debug!("{} thinking for {:?}", level, delay);

    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }

    let mut rng = StdRng::from_entropy();
    find_best_move(state, ai_color, level.config(), &mut rng)
}

/// What a finished [`AiTurn`] produced
#[derive(Debug)]
pub enum AiTurnOutcome {
    Ready {
        generation: u64,
        result: EngineResult<Option<AiMove>>,
    },
    Cancelled,
}

/// An AI decision running in the background, tagged with the session
/// generation it was started for.
#[derive(Debug)]
pub struct AiTurn {
    generation: u64,
    handle: JoinHandle<EngineResult<Option<AiMove>>>,
}

impl AiTurn {
    /// Start thinking about `state`. Must be called inside a Tokio runtime.
    pub fn spawn(
        state: GameState,
        level: AiLevel,
        ai_color: Color,
        thinking: ThinkingConfig,
        generation: u64,
    ) -> Self {
        let handle = tokio::spawn(async move {
            get_ai_move_with(&state, level, ai_color, &thinking).await
        });
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the decision. Takes effect immediately; a later
    /// [`AiTurn::outcome`] reports `Cancelled`.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the decision. Cancel-safe, so it can sit in a `select!`
    /// next to [`AiTurn::cancel`]; await it at most once to completion.
    pub async fn outcome(&mut self) -> AiTurnOutcome {
        match (&mut self.handle).await {
            Ok(result) => AiTurnOutcome::Ready {
                generation: self.generation,
                result,
            },
            Err(e) if e.is_cancelled() => AiTurnOutcome::Cancelled,
            Err(e) => AiTurnOutcome::Ready {
                generation: self.generation,
                result: Err(EngineError::CorruptState(format!("AI task failed: {e}"))),
            },
        }
    }
}

impl Drop for AiTurn {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
