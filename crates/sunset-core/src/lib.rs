//! Day cycle, content, settings, and game session for the Sunset engine.
//!
//! This crate owns the rules that tie the ledgers together: the
//! morning/night state machine that decides when a day may end, and the
//! [`Game`] session that owns every component and routes player actions.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `sunset-config.yaml` into
//!   strongly-typed structs.
//! - [`catalog`] -- Tasks, puzzles, and lore indexed from configuration.
//! - [`cycle`] -- [`DayCycle`]: day, phase, game over, and the transition
//!   gates.
//! - [`settings`] -- Clamped player settings.
//! - [`session`] -- [`Game`]: the composition root.
//!
//! [`DayCycle`]: cycle::DayCycle
//! [`Game`]: session::Game

pub mod catalog;
pub mod config;
pub mod cycle;
pub mod session;
pub mod settings;

pub use catalog::ContentCatalog;
pub use config::{ConfigError, GameConfig};
pub use cycle::{CycleError, DayCycle, Ledgers, Transition};
pub use session::{Game, SessionError};
pub use settings::{SettingsError, SettingsState};
