//! Error types for the guide core.

use thiserror::Error;

use crate::command::CommandKind;

/// Errors that escape a conversation turn.
///
/// Failures of individual commands never show up here; the sequencer turns
/// them into [`ActionOutcome`](crate::outcome::ActionOutcome) values and
/// recovers from them locally.
#[derive(Debug, Error)]
pub enum GuideError {
    /// The planner gateway could not produce a response.
    #[error("planner request failed: {0}")]
    Planner(String),

    /// The speech sink rejected an utterance.
    #[error("speech output failed: {0}")]
    Speech(String),

    /// The utterance source failed.
    #[error("listener failed: {0}")]
    Listener(String),

    /// A turn was requested before the session was started.
    #[error("conversation not started")]
    NotStarted,

    /// The session was started twice.
    #[error("conversation already started")]
    AlreadyStarted,
}

/// Failure reported by the actuation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuationError {
    /// The primitive failed for an unspecified reason.
    #[error("actuation failed: {0}")]
    Failed(String),

    /// The piloting goal cannot be reached.
    #[error("goal unreachable: {0}")]
    GoalUnreachable(String),
}

/// A command line whose payload could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required argument token is absent.
    #[error("{command}: missing argument")]
    MissingArgument {
        /// Command the line was routed to.
        command: CommandKind,
    },

    /// A numeric argument did not parse as a finite number.
    #[error("{command}: invalid number '{token}'")]
    InvalidNumber {
        /// Command the line was routed to.
        command: CommandKind,
        /// The offending token.
        token: String,
    },

    /// The line is not routed to any known command.
    #[error("unrecognized command line: {0}")]
    Unrecognized(String),
}

/// Result type for guide operations.
pub type Result<T> = std::result::Result<T, GuideError>;
