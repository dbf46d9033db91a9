use crate::ai::{find_best_move, AiLevel, AiTurnOutcome};
use crate::chess::{
    execute_move, result_token, to_pgn, Color, GameState, Move, MoveRequest, PgnHeaders, Position,
};
use crate::cli::commands::ConfigCommand;
use crate::cli::display::{render_board, render_levels, render_move_history, render_status, BoardStyle};
use crate::config::Config;
use crate::session::{AiSeat, ClickOutcome, GameSession, SessionError};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "\
Commands:
  e2e4, e7e8q, O-O, O-O-O   play a move
  moves <square>            show legal destinations for the piece on <square>
  history                   show the move list
  flip                      turn the board around
  fen | pgn                 print the position or the game so far
  resign | draw             end the game
  new                       start over
  help | quit";

/// Main application state
pub struct App {
    /// Application configuration
    pub config: Config,
}

/// Options for an interactive game
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub level: Option<AiLevel>,
    /// The human's side
    pub color: Option<Color>,
    pub ascii: bool,
    pub no_delay: bool,
    pub fen: Option<String>,
}

/// Summary of an AI-vs-AI game for `--json`
#[derive(Debug, Serialize)]
pub struct SelfPlayRecord {
    pub white: u16,
    pub black: u16,
    pub result: String,
    pub end_reason: Option<String>,
    pub moves: Vec<Move>,
    pub final_fen: String,
}

enum Input {
    Line(String),
    Eof,
    Interrupted,
}

async fn next_input<R>(lines: &mut tokio::io::Lines<R>) -> Result<Input>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    tokio::select! {
        line = lines.next_line() => {
            match line.context("Failed to read from stdin")? {
                Some(line) => Ok(Input::Line(line)),
                None => Ok(Input::Eof),
            }
        }
        _ = tokio::signal::ctrl_c() => Ok(Input::Interrupted),
    }
}

impl App {
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Starting board style; `flip` turns it around during play
    pub fn board_style(&self, ascii: bool) -> BoardStyle {
        BoardStyle {
            unicode: self.config.display.unicode && !ascii,
            perspective: self.config.display.perspective,
        }
    }

    /// Handle the 'play' command
    pub async fn handle_play(&self, options: PlayOptions) -> Result<()> {
        let level = options.level.unwrap_or(self.config.ai.level);
        let human = options
            .color
            .unwrap_or_else(|| self.config.ai.color.opposite());
        let mut thinking = self.config.ai.thinking.clone();
        if options.no_delay {
            thinking.enabled = false;
        }
        let mut style = self.board_style(options.ascii);

        let mut session = GameSession::against_ai(level, human.opposite(), thinking);
        if let Some(fen) = &options.fen {
            let state = GameState::from_fen(fen).context("Failed to load FEN position")?;
            session.load(state);
        }

        info!("New game: you play {} against {}", human, level);
        println!("You play {} against {}. Type 'help' for commands.", human, level);

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let mut redraw = true;

        loop {
            if redraw {
                println!();
                print!("{}", render_board(session.state(), style));
                println!("{}", render_status(session.state()));
                redraw = false;
            }

            if session.is_ai_turn() {
                println!("{} is thinking... (Ctrl-C to interrupt)", level);
                let mut turn = session.start_ai_turn()?;
                let outcome = tokio::select! {
                    outcome = turn.outcome() => outcome,
                    _ = tokio::signal::ctrl_c() => {
                        turn.cancel();
                        AiTurnOutcome::Cancelled
                    }
                };

                if matches!(outcome, AiTurnOutcome::Cancelled) {
                    println!("AI interrupted. Type 'quit' to leave or 'new' to restart.");
                    session.set_ai(None);
                    continue;
                }

                match session.apply_ai_turn(outcome)? {
                    Some(mv) => println!("{} plays {}", level.config().name, mv.san),
                    None => warn!("AI produced no move"),
                }
                redraw = true;
                continue;
            }

            if session.state().is_game_over() {
                println!("Result: {}", result_token(session.state()));
                println!("Type 'new' for another game, 'pgn' for the record or 'quit'.");
            }

            let line = match next_input(&mut lines).await? {
                Input::Line(line) => line,
                Input::Eof | Input::Interrupted => break,
            };
            let line = line.trim();
            let (command, argument) = match line.split_once(char::is_whitespace) {
                Some((command, argument)) => (command, argument.trim()),
                None => (line, ""),
            };

            match command.to_lowercase().as_str() {
                "" => {}
                "help" | "?" => println!("{}", HELP),
                "quit" | "exit" | "q" => break,
                "history" => print!("{}", render_move_history(session.state())),
                "fen" => println!("{}", session.state().to_fen()),
                "pgn" => println!("{}", to_pgn(session.state(), &pgn_headers(&session, human))),
                "flip" => {
                    style.perspective = style.perspective.opposite();
                    redraw = true;
                }
                "resign" => {
                    session.resign(human);
                    redraw = true;
                }
                "draw" => {
                    session.offer_draw();
                    println!("{} accepts the draw.", level.config().name);
                    redraw = true;
                }
                "new" => {
                    session.new_game();
                    session.set_ai(Some(AiSeat {
                        level,
                        color: human.opposite(),
                    }));
                    redraw = true;
                }
                "moves" => match argument.parse::<Position>() {
                    Ok(square) => {
                        session.clear_selection();
                        match session.click(square)? {
                            ClickOutcome::Selected { valid_moves, .. } if !valid_moves.is_empty() => {
                                print!("{}", render_board(session.state(), style));
                                let targets: Vec<String> =
                                    valid_moves.iter().map(|p| p.to_string()).collect();
                                println!("{}: {}", square, targets.join(" "));
                            }
                            _ => println!("No legal moves from {}", square),
                        }
                        session.clear_selection();
                    }
                    Err(e) => println!("{}", e),
                },
                _ => {
                    let mover = session.state().current_player;
                    let request = match MoveRequest::parse_for(line, mover) {
                        Ok(request) => request,
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    };
                    match session.play_human(request) {
                        Ok(mv) => {
                            println!("You play {}", mv.san);
                            redraw = true;
                        }
                        Err(SessionError::Engine(e)) => println!("{}", e),
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    /// Handle the 'selfplay' command
    pub fn handle_selfplay(
        &self,
        white: AiLevel,
        black: AiLevel,
        max_plies: u32,
        seed: Option<u64>,
        json: bool,
    ) -> Result<()> {
        let state = play_out(white, black, max_plies, seed)?;

        if json {
            let record = SelfPlayRecord {
                white: white.elo(),
                black: black.elo(),
                result: result_token(&state).to_string(),
                end_reason: state.end_reason().map(|r| r.to_string()),
                moves: state.move_history.clone(),
                final_fen: state.to_fen(),
            };
            let output =
                serde_json::to_string_pretty(&record).context("Failed to serialize game")?;
            println!("{}", output);
        } else {
            let headers = PgnHeaders {
                event: "knightfall self-play".to_string(),
                white: format!("knightfall {}", white),
                black: format!("knightfall {}", black),
                ..PgnHeaders::default()
            };
            println!("{}", to_pgn(&state, &headers));
        }

        Ok(())
    }

    /// Handle the 'levels' command
    pub fn handle_levels(&self) {
        print!("{}", render_levels());
    }

    /// Handle the 'config' command
    pub fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Path => {
                let path = Config::default_config_file()?;
                println!("{}", path.display());
            }
            ConfigCommand::Show => {
                let content = toml::to_string_pretty(&self.config)
                    .context("Failed to serialize configuration")?;
                print!("{}", content);
            }
            ConfigCommand::Reset => {
                self.config = Config::default();
                self.config.save().context("Failed to save configuration")?;
                info!("Configuration reset to defaults");
                println!("Configuration reset to defaults.");
            }
        }
        Ok(())
    }
}

fn pgn_headers(session: &GameSession, human: Color) -> PgnHeaders {
    let ai_name = session
        .ai_seat()
        .map(|seat| format!("knightfall {}", seat.level))
        .unwrap_or_else(|| "Player".to_string());
    let (white, black) = match human {
        Color::White => ("Player".to_string(), ai_name),
        Color::Black => (ai_name, "Player".to_string()),
    };
    PgnHeaders {
        white,
        black,
        ..PgnHeaders::default()
    }
}

/// Play `white` against `black` without thinking delays until the game ends
/// or `max_plies` moves have been made
pub fn play_out(
    white: AiLevel,
    black: AiLevel,
    max_plies: u32,
    seed: Option<u64>,
) -> Result<GameState> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = GameState::new();

    for _ in 0..max_plies {
        if state.is_game_over() {
            break;
        }
        let mover = state.current_player;
        let level = match mover {
            Color::White => white,
            Color::Black => black,
        };
        let Some(choice) = find_best_move(&state, mover, level.config(), &mut rng)? else {
            break;
        };
        state = execute_move(&state, choice.from, choice.to, choice.promotion_piece)
            .with_context(|| format!("{} chose an illegal move {}", level, choice))?;
    }

    if let Some(reason) = state.end_reason() {
        info!("Self-play finished after {} plies: {}", state.move_history.len(), reason);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_out_is_reproducible() {
        let a = play_out(AiLevel::Beginner, AiLevel::Master, 40, Some(11)).unwrap();
        let b = play_out(AiLevel::Beginner, AiLevel::Master, 40, Some(11)).unwrap();
        assert_eq!(a.to_fen(), b.to_fen());
        assert_eq!(a.move_history, b.move_history);
    }

    #[test]
    fn test_play_out_respects_ply_limit() {
        let state = play_out(AiLevel::Amateur, AiLevel::Amateur, 10, Some(2)).unwrap();
        assert!(state.move_history.len() <= 10);
        assert!(state.is_game_over() || state.move_history.len() == 10);
    }

    #[test]
    fn test_board_style_follows_display_settings() {
        let mut config = Config::default();
        config.display.perspective = Color::Black;
        let app = App::with_config(config);

        let style = app.board_style(false);
        assert_eq!(style.perspective, Color::Black);
        assert!(style.unicode);
        assert!(!app.board_style(true).unicode);

        let default_style = App::with_config(Config::default()).board_style(false);
        assert_eq!(default_style.perspective, Color::White);
    }

    #[test]
    fn test_pgn_headers_name_the_ai() {
        let session = GameSession::against_ai(
            AiLevel::Expert,
            Color::Black,
            crate::ai::ThinkingConfig::instant(),
        );
        let headers = pgn_headers(&session, Color::White);
        assert_eq!(headers.white, "Player");
        assert_eq!(headers.black, "knightfall Expert (2000)");
    }
}
