pub mod app;
pub mod commands;
pub mod display;

pub use app::{play_out, App, PlayOptions, SelfPlayRecord};
pub use commands::{Cli, Commands, ConfigCommand};
pub use display::{render_board, render_levels, render_move_history, render_status, BoardStyle};
