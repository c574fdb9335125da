//! Console driver for the Sunset day-cycle engine.
//!
//! This is the main entry point that wires the game session to a JSON save
//! file and a line-oriented console. It loads configuration, restores the
//! previous session if there is one, and reads commands from stdin until
//! `quit` or end of input, saving on the way out.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `sunset-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing) to stderr
//! 3. Open the save file
//! 4. Create the game and restore settings and any existing save
//! 5. Run the console loop

mod command;
mod console;
mod error;

use std::path::PathBuf;

use sunset_core::{Game, GameConfig};
use sunset_db::FileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "sunset-config.yaml";

/// Application entry point for the console driver.
///
/// # Errors
///
/// Returns an error if configuration, the save file, or the console fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = load_config(&config_path);

    // Logging goes to stderr so the console stays readable.
    let level = config
        .as_ref()
        .map_or_else(|_| "info".to_owned(), |c| c.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("sunset-engine starting");
    let config = config?;
    info!(
        config_path = %config_path.display(),
        rooms = config.rooms.len(),
        puzzles = config.puzzles.len(),
        tasks = config.tasks.len(),
        save_path = %config.save.path.display(),
        "Configuration loaded"
    );

    let store = FileStore::open(&config.save.path).map_err(EngineError::from)?;
    let mut game = Game::new(&config, store);
    let resumed = game.initialize().map_err(EngineError::from)?;
    info!(resumed, day = %game.day(), phase = ?game.phase(), "Game ready");

    let mut console = Console::new(game);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    console.run(stdin.lock(), &mut stdout)?;

    let game = console.game();
    info!(day = %game.day(), game_over = game.is_game_over(), "sunset-engine shutdown complete");
    Ok(())
}

/// Load configuration from `path`, falling back to the built-in content
/// when the file does not exist.
fn load_config(path: &std::path::Path) -> Result<GameConfig, EngineError> {
    if path.exists() {
        Ok(GameConfig::from_file(path)?)
    } else {
        let mut config = GameConfig::default();
        config.save.apply_env_overrides();
        Ok(config)
    }
}
