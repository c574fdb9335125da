//! Console command parsing.

use std::str::FromStr;

use sunset_types::{PillChoice, PuzzleId, RoomId, Setting};

/// One console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print day, phase, and today's progress.
    Status,
    /// Record today's pill choice.
    Pill(PillChoice),
    /// Present today's task.
    Task,
    /// Complete today's task.
    Done,
    /// Advance the day cycle.
    Advance,
    /// Discover a hidden room.
    Discover(RoomId),
    /// Enter a discovered room.
    Enter(RoomId),
    /// Solve a puzzle.
    Solve(PuzzleId),
    /// Change a setting.
    Volume(Setting, f32),
    /// Print the ending classification.
    Ending,
    /// Save now.
    Save,
    /// Load the save.
    Load,
    /// Delete the save and start over.
    Delete,
    /// List commands.
    Help,
    /// Save and exit.
    Quit,
}

/// Reasons a line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    /// A required argument is missing.
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// The command word.
        command: &'static str,
        /// What is missing.
        argument: &'static str,
    },

    /// An argument could not be understood.
    #[error("'{command}' cannot use '{value}'")]
    InvalidArgument {
        /// The command word.
        command: &'static str,
        /// The rejected argument.
        value: String,
    },
}

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  status                    day, phase, and today's progress
  pill taken|refused        choose today's pill
  task                      show today's task
  done                      finish today's task (night falls)
  advance                   move to the next phase
  discover <room>           discover a hidden room
  enter <room>              enter a discovered room
  solve <puzzle>            solve a puzzle
  volume <setting> <0..1>   master, music, sfx, or brightness
  ending                    current ending classification
  save | load | delete      manage the save
  quit                      save and exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Err(CommandError::Empty);
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "status" => Self::Status,
            "pill" => Self::Pill(parse_choice(words.next())?),
            "task" => Self::Task,
            "done" => Self::Done,
            "advance" | "next" => Self::Advance,
            "discover" => Self::Discover(RoomId::new(required(words.next(), "discover", "a room id")?)),
            "enter" => Self::Enter(RoomId::new(required(words.next(), "enter", "a room id")?)),
            "solve" => Self::Solve(PuzzleId::new(required(words.next(), "solve", "a puzzle id")?)),
            "volume" | "set" => {
                let name = required(words.next(), "volume", "a setting name")?;
                let setting = Setting::parse(name).ok_or_else(|| CommandError::InvalidArgument {
                    command: "volume",
                    value: name.to_owned(),
                })?;
                let raw = required(words.next(), "volume", "a value between 0 and 1")?;
                let Ok(value) = raw.parse::<f32>() else {
                    return Err(CommandError::InvalidArgument {
                        command: "volume",
                        value: raw.to_owned(),
                    });
                };
                Self::Volume(setting, value)
            }
            "ending" => Self::Ending,
            "save" => Self::Save,
            "load" => Self::Load,
            "delete" => Self::Delete,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn required<'a>(word: Option<&'a str>, command: &'static str, argument: &'static str) -> Result<&'a str, CommandError> {
    word.ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_choice(word: Option<&str>) -> Result<PillChoice, CommandError> {
    let word = required(word, "pill", "'taken' or 'refused'")?;
    match word.to_ascii_lowercase().as_str() {
        "taken" | "take" | "yes" => Ok(PillChoice::Taken),
        "refused" | "refuse" | "no" | "not_taken" => Ok(PillChoice::NotTaken),
        _ => Err(CommandError::InvalidArgument {
            command: "pill",
            value: word.to_owned(),
        }),
    }
}
