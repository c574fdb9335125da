//! Configuration loading and typed config structures for the Sunset engine.
//!
//! The canonical configuration lives in `sunset-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file. Every section is
//! optional; a missing section falls back to the built-in five-day content.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sunset_types::{Day, RoomId, RoomType, Settings, TaskDifficulty};

/// Environment variable that overrides `save.path`.
pub const SAVE_PATH_ENV: &str = "SUNSET_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `sunset-config.yaml`. The default holds the
/// built-in content: three hidden rooms, one puzzle per night, and an easy
/// and a hard task for every day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Rooms in registration order.
    #[serde(default = "default_rooms")]
    pub rooms: Vec<RoomConfig>,

    /// Hidden-room puzzles and their lore rewards.
    #[serde(default = "default_puzzles")]
    pub puzzles: Vec<PuzzleConfig>,

    /// Daily tasks, one per day and difficulty.
    #[serde(default = "default_tasks")]
    pub tasks: Vec<TaskConfig>,

    /// Default player settings.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Save file location and key layout.
    #[serde(default)]
    pub save: SaveConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SUNSET_SAVE_PATH` overrides `save.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.save.apply_env_overrides();
        Ok(config)
    }

    /// Room ids and types in registration order.
    pub fn room_layout(&self) -> Vec<(RoomId, RoomType)> {
        self.rooms
            .iter()
            .map(|room| (RoomId::new(room.id.as_str()), room.room_type))
            .collect()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            puzzles: default_puzzles(),
            tasks: default_tasks(),
            settings: SettingsConfig::default(),
            save: SaveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// One room in the house.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomConfig {
    /// Unique room identifier.
    pub id: String,

    /// Room type, hidden when omitted. An unrecognised type fails the parse.
    #[serde(default = "default_room_type", rename = "type")]
    pub room_type: RoomType,
}

/// One hidden-room puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleConfig {
    /// Unique puzzle identifier, `puzzle_day_{n}` for the nightly puzzles.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Lore unlocked when the puzzle is solved.
    #[serde(default)]
    pub lore: Option<LoreConfig>,
}

/// A lore entry granted by a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoreConfig {
    /// Unique lore identifier.
    pub id: String,

    /// Title shown when the entry is opened.
    #[serde(default)]
    pub title: String,

    /// Short preview shown in the lore list.
    #[serde(default)]
    pub preview: String,

    /// Day the entry relates to, 0 for none.
    #[serde(default)]
    pub day: u8,
}

/// One daily task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskConfig {
    /// Unique task identifier.
    pub id: String,

    /// Day the task belongs to.
    pub day: u8,

    /// Easy tasks follow a taken pill, hard tasks a refused one.
    pub difficulty: TaskDifficulty,

    /// Name shown on the tablet.
    #[serde(default)]
    pub name: String,

    /// Instructions shown on the tablet.
    #[serde(default)]
    pub instructions: String,
}

/// Default player settings, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SettingsConfig {
    /// Overall output volume.
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,

    /// Music volume.
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,

    /// Sound effect volume.
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume: f32,

    /// Screen brightness.
    #[serde(default = "default_brightness")]
    pub brightness: f32,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            master_volume: default_master_volume(),
            music_volume: default_music_volume(),
            sfx_volume: default_sfx_volume(),
            brightness: default_brightness(),
        }
    }
}

impl SettingsConfig {
    /// The configured defaults, clamped to `[0, 1]`.
    pub fn to_settings(&self) -> Settings {
        Settings {
            master_volume: self.master_volume.clamp(0.0, 1.0),
            music_volume: self.music_volume.clamp(0.0, 1.0),
            sfx_volume: self.sfx_volume.clamp(0.0, 1.0),
            brightness: self.brightness.clamp(0.0, 1.0),
        }
    }
}

/// Save file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Path of the JSON save file.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,

    /// Prefix prepended to every persisted key.
    #[serde(default)]
    pub key_prefix: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
            key_prefix: String::new(),
        }
    }
}

impl SaveConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV) {
            self.path = PathBuf::from(val);
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_room_type() -> RoomType {
    RoomType::Hidden
}

fn default_rooms() -> Vec<RoomConfig> {
    (1..=3)
        .map(|n| RoomConfig {
            id: format!("room_{n}"),
            room_type: RoomType::Hidden,
        })
        .collect()
}

fn default_puzzles() -> Vec<PuzzleConfig> {
    Day::all()
        .map(|day| PuzzleConfig {
            id: format!("puzzle_day_{day}"),
            name: format!("Night {day} puzzle"),
            lore: Some(LoreConfig {
                id: format!("lore_day_{day}"),
                title: format!("Recovered note, day {day}"),
                preview: String::new(),
                day: day.get(),
            }),
        })
        .collect()
}

fn default_tasks() -> Vec<TaskConfig> {
    Day::all()
        .flat_map(|day| {
            [TaskDifficulty::Easy, TaskDifficulty::Hard].map(|difficulty| {
                let label = match difficulty {
                    TaskDifficulty::Easy => "easy",
                    TaskDifficulty::Hard => "hard",
                };
                TaskConfig {
                    id: format!("task_day{day}_{label}"),
                    day: day.get(),
                    difficulty,
                    name: format!("Day {day} task ({label})"),
                    instructions: String::new(),
                }
            })
        })
        .collect()
}

const fn default_master_volume() -> f32 {
    0.8
}

const fn default_music_volume() -> f32 {
    0.7
}

const fn default_sfx_volume() -> f32 {
    0.7
}

const fn default_brightness() -> f32 {
    0.5
}

fn default_save_path() -> PathBuf {
    PathBuf::from("sunset-save.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_builtin_content() {
        let config = GameConfig::parse("{}").unwrap();
        assert_eq!(config.rooms.len(), 3);
        assert!(config.rooms.iter().all(|r| r.room_type == RoomType::Hidden));
        assert_eq!(config.puzzles.len(), 5);
        assert_eq!(config.tasks.len(), 10);
        assert_eq!(config.settings.to_settings(), Settings::default());
        assert!(config.save.key_prefix.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn default_matches_empty_yaml() {
        let parsed = GameConfig::parse("{}").unwrap();
        let builtin = GameConfig::default();
        assert_eq!(parsed.rooms, builtin.rooms);
        assert_eq!(parsed.tasks, builtin.tasks);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
rooms:
  - id: kitchen
    type: task
  - id: cellar
    type: hidden

puzzles:
  - id: puzzle_day_1
    name: "Fuse box"
    lore:
      id: lore_fuse
      title: "Wiring diagram"
      day: 1

tasks:
  - id: dishes
    day: 1
    difficulty: easy
    name: "Wash the dishes"

settings:
  master_volume: 1.5
  brightness: 0.25

save:
  path: "/tmp/slot.json"
  key_prefix: "slot1."

logging:
  level: "debug"
"#;
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(
            config.room_layout(),
            vec![
                (RoomId::from("kitchen"), RoomType::Task),
                (RoomId::from("cellar"), RoomType::Hidden),
            ]
        );
        assert_eq!(
            config.puzzles.first().and_then(|p| p.lore.as_ref()).map(|l| l.id.as_str()),
            Some("lore_fuse")
        );
        assert_eq!(config.tasks.len(), 1);
        let settings = config.settings.to_settings();
        assert!((settings.master_volume - 1.0).abs() < f32::EPSILON);
        assert!((settings.music_volume - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.save.key_prefix, "slot1.");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn shipped_config_parses() {
        let config = GameConfig::parse(include_str!("../../../sunset-config.yaml")).unwrap();
        assert_eq!(config.rooms.len(), 3);
        assert_eq!(config.puzzles.len(), 5);
        assert_eq!(config.tasks.len(), 10);
        assert_eq!(config.settings.to_settings(), Settings::default());
    }

    #[test]
    fn missing_room_type_is_hidden() {
        let config = GameConfig::parse("rooms:\n  - id: attic\n").unwrap();
        assert_eq!(config.room_layout(), vec![(RoomId::from("attic"), RoomType::Hidden)]);
    }

    #[test]
    fn unknown_room_type_is_an_error() {
        let result = GameConfig::parse("rooms:\n  - id: attic\n    type: cellar\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(GameConfig::parse("rooms: [unclosed"), Err(ConfigError::Yaml { .. })));
    }
}
