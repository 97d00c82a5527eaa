//! Planner response classification.
//!
//! A response is either plain speech, spoken in one piece, or a command
//! response. The decision is structural: a response is a command response as
//! soon as one of its non-empty lines starts with the command marker.

use tracing::debug;

use crate::command::{CommandLine, CommandQueue};

/// Result of classifying one planner response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No marked line: the original text, unsplit.
    Speech(String),
    /// At least one marked line: every non-empty line, in order.
    Commands(CommandQueue),
}

impl Classification {
    /// Returns true for a command response.
    pub fn is_commands(&self) -> bool {
        matches!(self, Self::Commands(_))
    }
}

/// Classifies a planner response.
///
/// In a command response every unmarked line is rewritten as a `say` line
/// carrying its text unchanged.
pub fn classify(response: &str) -> Classification {
    let lines: Vec<&str> = response.lines().filter(|line| !line.is_empty()).collect();

    let marked = lines
        .iter()
        .filter(|line| CommandLine::new(**line).is_marked())
        .count();
    if marked == 0 {
        return Classification::Speech(response.to_string());
    }

    debug!(lines = lines.len(), marked, "classified command response");

    let queue = lines
        .into_iter()
        .map(|line| {
            let line = CommandLine::new(line);
            if line.is_marked() {
                line
            } else {
                CommandLine::say(line.as_str())
            }
        })
        .collect();
    Classification::Commands(queue)
}
