//! The console loop: read a command, run it against the game, print the
//! outcome and every event it caused.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use sunset_core::{Game, SessionError, Transition};
use sunset_db::KeyValueStore;
use sunset_types::GameEvent;
use tracing::{error, info};

use crate::command::{Command, HELP};
use crate::error::EngineError;

/// Drives a [`Game`] from line-oriented input.
pub struct Console<S> {
    game: Game<S>,
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl<S: KeyValueStore> Console<S> {
    /// Wrap `game`, capturing its events for printing.
    pub fn new(mut game: Game<S>) -> Self {
        let events: Rc<RefCell<Vec<GameEvent>>> = Rc::default();
        let sink = Rc::clone(&events);
        game.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self { game, events }
    }

    /// The wrapped game.
    pub const fn game(&self) -> &Game<S> {
        &self.game
    }

    /// Read commands until `quit` or end of input, then save.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if reading input or writing output fails.
    /// A failed auto-save is logged, not returned.
    pub fn run(&mut self, input: impl BufRead, output: &mut impl Write) -> Result<(), EngineError> {
        writeln!(output, "{}", self.status())?;
        self.flush_events(output)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(output, "? {e}")?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            let reply = self.execute(&command);
            self.flush_events(output)?;
            match reply {
                Ok(text) => writeln!(output, "{text}")?,
                Err(e) => writeln!(output, "refused: {e}")?,
            }
        }

        match self.game.save() {
            Ok(()) => {
                info!("Auto-saved on exit");
                writeln!(output, "saved, goodbye")?;
            }
            Err(e) => {
                error!(error = %e, "Auto-save failed");
                writeln!(output, "auto-save failed: {e}")?;
            }
        }
        self.events.borrow_mut().clear();
        Ok(())
    }

    fn execute(&mut self, command: &Command) -> Result<String, SessionError> {
        let game = &mut self.game;
        let text = match command {
            Command::Status => self.status(),
            Command::Pill(choice) => {
                game.record_pill(*choice)?;
                format!("pill recorded: {choice:?}")
            }
            Command::Task => {
                let task = game.spawn_task()?;
                format!("task: {} ({:?}) {}", task.name, task.difficulty, task.instructions)
                    .trim_end()
                    .to_owned()
            }
            Command::Done => describe(game.complete_active_task()?),
            Command::Advance => describe(game.advance()?),
            Command::Discover(room_id) => {
                game.discover_room(room_id)?;
                format!("discovered {room_id}")
            }
            Command::Enter(room_id) => {
                let outcome = game.enter_room(room_id)?;
                match game.active_puzzle() {
                    Some(puzzle_id) => format!("entered {room_id} ({outcome:?}), puzzle waiting: {puzzle_id}"),
                    None => format!("entered {room_id} ({outcome:?})"),
                }
            }
            Command::Solve(puzzle_id) => {
                game.complete_puzzle(puzzle_id)?;
                format!("solved {puzzle_id}")
            }
            Command::Volume(setting, value) => {
                let stored = game.set_setting(*setting, *value)?;
                format!("{} = {stored:.2}", setting.key())
            }
            Command::Ending => format!("ending: {}", game.ending()),
            Command::Save => {
                game.save()?;
                "saved".to_owned()
            }
            Command::Load => {
                game.load()?;
                self.status()
            }
            Command::Delete => {
                game.delete_save()?;
                "save deleted, new game".to_owned()
            }
            Command::Help => HELP.to_owned(),
            Command::Quit => String::new(),
        };
        Ok(text)
    }

    fn status(&self) -> String {
        let game = &self.game;
        let day = game.day();
        let mut text = format!(
            "day {day} {:?} | pill: {:?} | task done: {}",
            game.phase(),
            game.ledgers().pills.choice(day.get()),
            game.ledgers().tasks.is_completed(day.get()),
        );
        if let Some(task) = game.active_task() {
            text.push_str(&format!(" | active task: {}", task.id));
        }
        if let Some(puzzle_id) = game.active_puzzle() {
            text.push_str(&format!(" | puzzle: {puzzle_id}"));
        }
        if game.is_game_over() {
            text.push_str(&format!(" | game over ({})", game.ending()));
        }
        text
    }

    fn flush_events(&self, output: &mut impl Write) -> Result<(), EngineError> {
        for event in self.events.borrow_mut().drain(..) {
            let payload = serde_json::to_string(&event).unwrap_or_else(|_| event.name().to_owned());
            writeln!(output, "  * {payload}")?;
        }
        Ok(())
    }
}

fn describe(transition: Transition) -> String {
    match transition {
        Transition::NightBegan => "night falls".to_owned(),
        Transition::EndedEarly(day) => format!("the story ends early on day {day}"),
        Transition::NewDay(day) => format!("morning of day {day}"),
        Transition::GameComplete => "the story is complete".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use sunset_core::GameConfig;
    use sunset_db::MemoryStore;
    use sunset_types::{Day, Phase};

    use super::*;

    fn run(script: &str) -> (Console<MemoryStore>, String) {
        let game = Game::new(&GameConfig::default(), MemoryStore::new());
        let mut console = Console::new(game);
        let mut out = Vec::new();
        console.run(Cursor::new(script.to_owned()), &mut out).unwrap();
        (console, String::from_utf8(out).unwrap())
    }

    #[test]
    fn plays_first_day_and_autosaves() {
        let (console, out) = run("pill taken\ntask\ndone\nadvance\nstatus\nquit\nstatus\n");
        assert_eq!(console.game().day(), Day::new(2).unwrap());
        assert_eq!(console.game().phase(), Phase::Morning);
        assert!(out.contains("night falls"));
        assert!(out.contains("morning of day 2"));
        assert!(out.contains("\"PillRecorded\""));
        assert!(out.ends_with("saved, goodbye\n"));
        assert!(console.game().save_slot().save_exists());
    }

    #[test]
    fn refusals_and_typos_are_reported() {
        let (console, out) = run("advance\npill refused\nfly\n");
        assert!(out.contains("refused: no pill choice recorded for day 1"));
        assert!(out.contains("refused: day 1 is scripted"));
        assert!(out.contains("? unknown command 'fly'"));
        assert_eq!(console.game().phase(), Phase::Morning);
    }

    #[test]
    fn volume_is_clamped_and_persisted() {
        let (console, out) = run("volume music 4\n");
        assert!(out.contains("MusicVolume = 1.00"));
        assert!(console.game().save_slot().store().has_key("MusicVolume"));
    }
}
