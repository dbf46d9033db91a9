use anyhow::Result;
use clap::Parser;
use knightfall::cli::{App, Cli, Commands, PlayOptions};
use knightfall::config::Config;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file should not stop the logger from coming up
    let loaded = Config::load_or_create_default();
    let filter = match &loaded {
        Ok(config) => config.log_filter.clone(),
        Err(_) => Config::default().log_filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = loaded.unwrap_or_else(|e| {
        warn!("Using default configuration: {:#}", e);
        Config::default()
    });
    let mut app = App::with_config(config);

    match cli.command {
        Commands::Play {
            level,
            color,
            ascii,
            no_delay,
            fen,
        } => {
            app.handle_play(PlayOptions {
                level,
                color,
                ascii,
                no_delay,
                fen,
            })
            .await?;
        }
        Commands::Selfplay {
            white,
            black,
            max_plies,
            seed,
            json,
        } => {
            app.handle_selfplay(white, black, max_plies, seed, json)?;
        }
        Commands::Levels => app.handle_levels(),
        Commands::Config { command } => app.handle_config(command)?,
    }

    Ok(())
}
