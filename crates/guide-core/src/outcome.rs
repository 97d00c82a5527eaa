//! Command outcomes and per-kind failure recovery.

use std::fmt;

use crate::command::CommandKind;
use crate::error::{ActuationError, ParseError};

/// Spoken when a doorway cannot be passed.
pub const DOORWAY_APOLOGY: &str = "Could not pass through that doorway.";

/// Spoken when a marker is missing from the world map.
pub const MARKER_NOT_FOUND: &str = "Could not find that marker.";

/// Spoken when the piloting goal near a marker cannot be reached.
pub const MARKER_UNREACHABLE: &str = "That marker is unreachable.";

/// Why a command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A required argument was absent; no actuator call was made.
    MissingArgument,
    /// An argument was present but unusable; no actuator call was made.
    InvalidArgument(String),
    /// The world map has no suitable entry for this identifier.
    NotFound(String),
    /// The actuator reported the goal as unreachable.
    Unreachable(String),
    /// The actuator failed for any other reason.
    Actuator(String),
}

impl From<ParseError> for FailureReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MissingArgument { .. } => Self::MissingArgument,
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl From<ActuationError> for FailureReason {
    fn from(err: ActuationError) -> Self {
        match err {
            ActuationError::GoalUnreachable(msg) => Self::Unreachable(msg),
            ActuationError::Failed(msg) => Self::Actuator(msg),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument => f.write_str("missing argument"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Self::NotFound(id) => write!(f, "not found: {}", id),
            Self::Unreachable(msg) => write!(f, "unreachable: {}", msg),
            Self::Actuator(msg) => write!(f, "actuator failure: {}", msg),
        }
    }
}

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed(FailureReason),
}

impl ActionOutcome {
    /// Returns true if the command completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The failure reason, if any.
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Completed => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

impl<E: Into<FailureReason>> From<Result<(), E>> for ActionOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(err) => Self::Failed(err.into()),
        }
    }
}

/// What the sequencer does after a failed command.
///
/// Either way the next queued line runs afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Move on without saying anything.
    Continue,
    /// Speak the message, then move on.
    Apologize(&'static str),
}

impl Recovery {
    /// Picks the recovery for a failed command of `kind`.
    pub fn for_failure(kind: CommandKind, reason: &FailureReason) -> Self {
        match (kind, reason) {
            (CommandKind::DoorPass, _) => Self::Apologize(DOORWAY_APOLOGY),
            (CommandKind::PilotToAruco, FailureReason::Unreachable(_)) => {
                Self::Apologize(MARKER_UNREACHABLE)
            }
            (CommandKind::PilotToAruco, _) => Self::Apologize(MARKER_NOT_FOUND),
            _ => Self::Continue,
        }
    }
}
