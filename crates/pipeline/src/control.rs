//! Manual slowdown control from a line-oriented input

use crate::PipelineError;
use cadence_scheduler::ManualSlowdown;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// One line of control input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlowdownCommand {
    /// `+`: one more tick
    Increase,
    /// `-`: one fewer tick, stopping at zero
    Decrease,
    /// A number: set outright
    Set(u32),
}

impl FromStr for SlowdownCommand {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(SlowdownCommand::Increase),
            "-" => Ok(SlowdownCommand::Decrease),
            other => other
                .parse()
                .map(SlowdownCommand::Set)
                .map_err(|_| PipelineError::InvalidCommand(other.to_string())),
        }
    }
}

impl SlowdownCommand {
    /// Apply to the knob; returns the new slowdown
    pub fn apply(self, slowdown: &ManualSlowdown) -> u32 {
        match self {
            SlowdownCommand::Increase => slowdown.increase(1),
            SlowdownCommand::Decrease => slowdown.decrease(1),
            SlowdownCommand::Set(ticks) => {
                slowdown.set(ticks);
                ticks
            }
        }
    }
}

/// Apply every command read from `reader` until end of input.
/// Blank lines are skipped and bad lines are logged. Returns the number of
/// commands applied.
pub fn apply_commands<R: BufRead>(reader: R, slowdown: &ManualSlowdown) -> io::Result<usize> {
    let mut applied = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<SlowdownCommand>() {
            Ok(command) => {
                let ticks = command.apply(slowdown);
                info!(?command, ticks, "Slowdown adjusted");
                applied += 1;
            }
            Err(err) => warn!(error = %err, "Ignoring control input"),
        }
    }

    Ok(applied)
}

/// Read commands from stdin on a detached thread
pub fn spawn_stdin_control(slowdown: Arc<ManualSlowdown>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("slowdown-control".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            match apply_commands(stdin.lock(), &slowdown) {
                Ok(applied) => info!(applied, "Control input closed"),
                Err(err) => warn!(error = %err, "Control input failed"),
            }
        })
}
