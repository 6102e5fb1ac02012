//! # Replay Driver
//!
//! Runs a navigation script against an in-memory history and a card stack,
//! printing the renderer snapshot every time the stack changes.
//!
//! ```text
//! script line ─▶ Command ─▶ MemoryHistory ─▶ take_pending() ─▶ CardStack ─▶ JsonRenderer
//!                   │
//!                   └─ press-back ─▶ BackHandlerStack ─▶ BackButtonBridge ─▶ go_back()
//! ```
//!
//! A `press-back` nobody handles ends the replay, the way an unhandled
//! hardware back press exits an app.

pub mod command;

use log::{info, warn};
use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::OutputFormat;
use crate::core::bridge::{BackButtonBridge, BackHandlerStack};
use crate::core::config::ResolvedConfig;
use crate::core::history::{History, MemoryHistory};
use crate::core::stack::{CardStack, CardsRenderer, CardsRendererProps, StackError};
use command::{Command, CommandError, parse_line};

pub type SharedOutput = Rc<RefCell<dyn Write>>;

#[derive(Debug)]
pub enum ReplayError {
    Stack(StackError),
    Command { line: usize, source: CommandError },
    Io(io::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Stack(e) => write!(f, "{e}"),
            ReplayError::Command { line, source } => write!(f, "line {line}: {source}"),
            ReplayError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<StackError> for ReplayError {
    fn from(e: StackError) -> Self {
        ReplayError::Stack(e)
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        ReplayError::Io(e)
    }
}

/// What happened during a replay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands: usize,
    pub updates: usize,
    pub skipped: usize,
    /// True if an unhandled back press ended the replay.
    pub exited: bool,
}

/// Writes each snapshot as JSON to the shared output.
pub struct JsonRenderer {
    out: SharedOutput,
    format: OutputFormat,
}

impl JsonRenderer {
    pub fn new(out: SharedOutput, format: OutputFormat) -> Self {
        Self { out, format }
    }

    fn write(&self, props: &CardsRendererProps<'_>) -> io::Result<()> {
        let json = match self.format {
            OutputFormat::Json => serde_json::to_string(props),
            OutputFormat::Pretty => serde_json::to_string_pretty(props),
        }
        .map_err(io::Error::other)?;
        writeln!(self.out.borrow_mut(), "{json}")
    }
}

impl CardsRenderer for JsonRenderer {
    fn render(&mut self, props: CardsRendererProps<'_>) {
        if let Err(e) = self.write(&props) {
            warn!("Failed to write snapshot: {}", e);
        }
    }
}

/// Replay `input` line by line, writing snapshots to `out`.
pub fn run<R: BufRead>(
    config: &ResolvedConfig,
    input: R,
    out: SharedOutput,
    format: OutputFormat,
) -> Result<ReplaySummary, ReplayError> {
    let history = Rc::new(MemoryHistory::new(
        &config.initial_entries,
        config.initial_index,
    ));
    let renderer = JsonRenderer::new(Rc::clone(&out), format);
    let mut stack = CardStack::new(config.cards.as_deref(), history.props(), history.clone())?
        .with_renderer(Box::new(JsonRenderer::new(Rc::clone(&out), format)));

    let back_signal = Rc::new(BackHandlerStack::new());
    let mut bridge = BackButtonBridge::new(back_signal.clone(), stack.back_handler());
    bridge.activate();

    let mut summary = ReplaySummary::default();
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let command = parse_line(&line).map_err(|source| ReplayError::Command {
            line: number + 1,
            source,
        })?;
        let Some(command) = command else {
            continue;
        };
        summary.commands += 1;

        match command {
            Command::Push(path) => history.push(&path),
            Command::Replace(path) => history.replace(&path),
            Command::Go(steps) => history.go(steps),
            Command::Back => history.go_back(),
            Command::Forward => history.go_forward(),
            Command::PressBack => {
                if !back_signal.dispatch() {
                    writeln!(out.borrow_mut(), "exit")?;
                    summary.exited = true;
                    break;
                }
            }
            Command::State => renderer.write(&stack.renderer_props())?,
        }

        for props in history.take_pending() {
            if stack.receive_props(props).is_updated() {
                summary.updates += 1;
            } else {
                summary.skipped += 1;
            }
        }
    }

    bridge.deactivate();
    info!(
        "Replay finished: {} commands, {} updates, {} skipped",
        summary.commands, summary.updates, summary.skipped
    );
    Ok(summary)
}
