//! Presentation adapter.
//!
//! Front-ends never touch the ledger directly. They turn user input into a
//! [`Command`], hand it to [`dispatch`] together with a [`Renderer`], and get
//! called back with a fresh [`LedgerView`] whenever state changed, or with a
//! [`Notice`] when the user needs to be told something.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::ledger::{parse_cost, ActivityId, EnergyLevel, Ledger, DAILY_SPOONS};
use crate::tracker::SpoonTracker;

/// Gauge never draws more than this many full spoons.
const GAUGE_MAX_SPOONS: usize = 15;
const SPOON_GLYPH: &str = "🥄";
const EMPTY_GLYPH: &str = "⚫";

/// Snapshot of everything a renderer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerView {
    pub spoons: u32,
    pub total_spent: u32,
    pub completed_activities: u32,
    pub energy_level: EnergyLevel,
    pub activities: Vec<ActivityView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: ActivityId,
    pub name: String,
    pub cost: u32,
    /// False when completing it now would be refused.
    pub affordable: bool,
}

impl LedgerView {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            spoons: ledger.spoons(),
            total_spent: ledger.total_spent(),
            completed_activities: ledger.completed_activities(),
            energy_level: ledger.energy_level(),
            activities: ledger
                .activities()
                .iter()
                .map(|a| ActivityView {
                    id: a.id,
                    name: a.name.clone(),
                    cost: a.cost,
                    affordable: ledger.spoons() >= a.cost,
                })
                .collect(),
        }
    }
}

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSpoon,
    RemoveSpoon,
    /// `confirmed` must come from an explicit user confirmation.
    ResetDay { confirmed: bool },
    /// Cost stays raw text; it is parsed leniently on dispatch.
    AddActivity { name: String, cost_text: String },
    CompleteActivity(ActivityId),
    RemoveActivity(ActivityId),
    /// Re-render without changing anything.
    Show,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {what}")]
    MissingArgument { command: String, what: &'static str },

    #[error("'{0}' is not an activity id")]
    InvalidId(String),
}

impl Command {
    /// Parse one line of the text front-end.
    ///
    /// `add <name…> [cost]` treats the last word as the cost only when it
    /// starts with a number; otherwise the whole rest is the name.
    /// `reset` parses unconfirmed.
    pub fn parse(line: &str) -> Result<Self, ParseCommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "+" | "spoon+" | "add-spoon" => Ok(Command::AddSpoon),
            "-" | "spoon-" | "spend" | "remove-spoon" => Ok(Command::RemoveSpoon),
            "reset" => Ok(Command::ResetDay { confirmed: false }),
            "show" | "list" | "ls" => Ok(Command::Show),
            "add" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "add".into(),
                        what: "an activity name",
                    });
                }
                let (name, cost_text) = split_trailing_cost(rest);
                Ok(Command::AddActivity {
                    name: name.to_string(),
                    cost_text: cost_text.to_string(),
                })
            }
            "do" | "done" | "complete" => parse_id("do", rest).map(Command::CompleteActivity),
            "rm" | "remove" | "drop" => parse_id("rm", rest).map(Command::RemoveActivity),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

fn split_trailing_cost(rest: &str) -> (&str, &str) {
    if let Some((name, last)) = rest.rsplit_once(char::is_whitespace) {
        let numeric = last
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit());
        if numeric {
            return (name.trim_end(), last);
        }
    }
    (rest, "")
}

fn parse_id(command: &str, rest: &str) -> Result<ActivityId, ParseCommandError> {
    if rest.is_empty() {
        return Err(ParseCommandError::MissingArgument {
            command: command.to_string(),
            what: "an activity id",
        });
    }
    rest.parse()
        .map_err(|_| ParseCommandError::InvalidId(rest.to_string()))
}

/// Something the user should be told that is not a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(ValidationError),
    CannotAfford { name: String, cost: u32, spoons: u32 },
    CriticalEnergy { spoons: u32 },
    ResetCancelled,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Validation(e) => write!(f, "{e}"),
            Notice::CannotAfford { name, cost, spoons } => write!(
                f,
                "Not enough spoons for '{name}' (needs {cost}, {spoons} left)"
            ),
            Notice::CriticalEnergy { .. } => {
                f.write_str("Warning! Your energy is critical. Consider resting!")
            }
            Notice::ResetCancelled => f.write_str("Reset cancelled"),
        }
    }
}

/// Visual side of the tracker.
pub trait Renderer {
    /// Called after every state change with the current view.
    fn render(&mut self, view: &LedgerView);

    fn notify(&mut self, notice: &Notice);
}

/// Apply one command. Returns whether the ledger changed.
pub fn dispatch(tracker: &mut SpoonTracker, renderer: &mut dyn Renderer, command: Command) -> bool {
    let changed = match command {
        Command::AddSpoon => {
            tracker.add_spoon();
            true
        }
        Command::RemoveSpoon => {
            let before = tracker.ledger().spoons();
            tracker.remove_spoon();
            tracker.ledger().spoons() != before
        }
        Command::ResetDay { confirmed: false } => {
            renderer.notify(&Notice::ResetCancelled);
            false
        }
        Command::ResetDay { confirmed: true } => {
            tracker.reset_day();
            true
        }
        Command::AddActivity { name, cost_text } => {
            match tracker.add_activity(&name, parse_cost(&cost_text)) {
                Ok(_) => true,
                Err(e) => {
                    renderer.notify(&Notice::Validation(e));
                    false
                }
            }
        }
        Command::CompleteActivity(id) => {
            let pending = tracker.ledger().activity(id).cloned();
            if tracker.complete_activity(id) {
                renderer.render(&tracker.view());
                let spoons = tracker.ledger().spoons();
                if tracker.ledger().energy_level() == EnergyLevel::Critical {
                    renderer.notify(&Notice::CriticalEnergy { spoons });
                }
                return true;
            }
            if let Some(activity) = pending {
                renderer.notify(&Notice::CannotAfford {
                    name: activity.name,
                    cost: activity.cost,
                    spoons: tracker.ledger().spoons(),
                });
            }
            false
        }
        Command::RemoveActivity(id) => tracker.remove_activity(id).is_some(),
        Command::Show => {
            renderer.render(&tracker.view());
            return false;
        }
    };

    if changed {
        renderer.render(&tracker.view());
    }
    changed
}

/// Plain-text rendering of a view.
pub fn render_text(view: &LedgerView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Spoons: {:>2}  {}\n", view.spoons, spoon_gauge(view.spoons)));
    out.push_str(&format!(
        "Energy: {} | Spent: {} | Done: {}\n",
        view.energy_level, view.total_spent, view.completed_activities
    ));
    out.push_str("Activities:\n");
    if view.activities.is_empty() {
        out.push_str("  No activities yet\n");
    }
    for activity in &view.activities {
        out.push_str(&format!(
            "  #{:<3} [{:>2} {}] {}{}\n",
            activity.id,
            activity.cost,
            SPOON_GLYPH,
            activity.name,
            if activity.affordable { "" } else { "  (not enough spoons)" }
        ));
    }
    out
}

/// One spoon glyph per spoon (capped), then one empty glyph per spoon
/// missing from the daily allowance.
pub fn spoon_gauge(spoons: u32) -> String {
    let full = (spoons as usize).min(GAUGE_MAX_SPOONS);
    let empty = DAILY_SPOONS.saturating_sub(spoons) as usize;
    format!("{}{}", SPOON_GLYPH.repeat(full), EMPTY_GLYPH.repeat(empty))
}

/// Renderer writing [`render_text`] output and notices to any writer.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &LedgerView) {
        let text = render_text(view);
        self.write(&text);
    }

    fn notify(&mut self, notice: &Notice) {
        let prefix = match notice {
            Notice::CriticalEnergy { .. } => "⚠️  ",
            _ => "! ",
        };
        self.write(&format!("{prefix}{notice}\n"));
    }
}
