//! Command lines, command queues and the dispatch table.
//!
//! A planner response that contains at least one marked line becomes a
//! [`CommandQueue`]. The [`DispatchTable`] routes each [`CommandLine`] to a
//! [`CommandKind`]: entries are checked top to bottom, the first match wins,
//! and anything left over is [`CommandKind::Unrecognized`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::OnceLock;

use crate::patterns::Pattern;

/// Character that introduces a command line.
pub const COMMAND_MARKER: char = '#';

/// Every kind of command the sequencer knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Say,
    Forward,
    Sideways,
    Turn,
    TurnToward,
    Drop,
    PickUp,
    Glow,
    DoorPass,
    PilotToAruco,
    Camera,
    /// Default kind for marked lines no table entry claims.
    Unrecognized,
}

impl CommandKind {
    /// Recognized kinds in dispatch priority order.
    pub const ROUTED: [CommandKind; 11] = [
        CommandKind::Say,
        CommandKind::Forward,
        CommandKind::Sideways,
        CommandKind::Turn,
        CommandKind::TurnToward,
        CommandKind::Drop,
        CommandKind::PickUp,
        CommandKind::Glow,
        CommandKind::DoorPass,
        CommandKind::PilotToAruco,
        CommandKind::Camera,
    ];

    /// The command name as it appears after the marker.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::Forward => "forward",
            Self::Sideways => "sideways",
            Self::Turn => "turn",
            Self::TurnToward => "turntoward",
            Self::Drop => "drop",
            Self::PickUp => "pickup",
            Self::Glow => "glow",
            Self::DoorPass => "doorpass",
            Self::PilotToAruco => "pilottoaruco",
            Self::Camera => "camera",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether the command takes a payload after its name.
    pub fn takes_payload(&self) -> bool {
        !matches!(self, Self::Drop | Self::Camera)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One non-empty line of a classified planner response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// Wraps a line as-is.
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// Builds a synthetic `say` line carrying `text` verbatim.
    pub fn say(text: &str) -> Self {
        Self(format!("{}say {}", COMMAND_MARKER, text))
    }

    /// Returns true if the line starts with the command marker.
    pub fn is_marked(&self) -> bool {
        self.0.starts_with(COMMAND_MARKER)
    }

    /// The full line text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated tokens, the command token included.
    pub fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.0.split_whitespace()
    }

    /// Text after the command token and the single delimiter that follows it.
    ///
    /// Anything beyond that first delimiter is returned untouched, so a `say`
    /// line gives back exactly the text it was built from.
    pub fn payload(&self) -> &str {
        let Some(body) = self.0.strip_prefix(COMMAND_MARKER) else {
            return &self.0;
        };
        match body.find(char::is_whitespace) {
            Some(idx) => {
                let mut rest = body[idx..].chars();
                rest.next();
                rest.as_str()
            }
            None => "",
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, one-shot sequence of command lines from a single planner turn.
///
/// Lines come out front to back and are never re-ordered; once drained the
/// queue is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    lines: VecDeque<CommandLine>,
}

impl CommandQueue {
    /// Creates a queue from lines in order.
    pub fn new(lines: Vec<CommandLine>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    /// Takes the next line off the front.
    pub fn next_line(&mut self) -> Option<CommandLine> {
        self.lines.pop_front()
    }

    /// Number of lines not yet taken.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing is left.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over the remaining lines without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &CommandLine> {
        self.lines.iter()
    }
}

impl FromIterator<CommandLine> for CommandQueue {
    fn from_iter<I: IntoIterator<Item = CommandLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Priority-ordered table mapping line patterns to command kinds.
#[derive(Debug)]
pub struct DispatchTable {
    entries: Vec<(CommandKind, Pattern)>,
}

impl DispatchTable {
    /// Builds the table for every routed kind, in priority order.
    pub fn new() -> Self {
        let entries = CommandKind::ROUTED
            .iter()
            .map(|&kind| {
                let pattern = if kind.takes_payload() {
                    Pattern::with_payload(kind.name(), COMMAND_MARKER)
                } else {
                    Pattern::bare(kind.name(), COMMAND_MARKER)
                };
                (kind, pattern)
            })
            .collect();
        Self { entries }
    }

    /// Shared instance of the standard table.
    pub fn standard() -> &'static DispatchTable {
        static TABLE: OnceLock<DispatchTable> = OnceLock::new();
        TABLE.get_or_init(DispatchTable::new)
    }

    /// Routes a line to the first matching kind.
    pub fn resolve(&self, line: &CommandLine) -> CommandKind {
        self.entries
            .iter()
            .find(|(_, pattern)| pattern.matches(line.as_str()))
            .map(|(kind, _)| *kind)
            .unwrap_or(CommandKind::Unrecognized)
    }

    /// Kinds in the order they are checked.
    pub fn kinds(&self) -> impl Iterator<Item = CommandKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(line: &str) -> CommandKind {
        DispatchTable::standard().resolve(&CommandLine::new(line))
    }

    #[test]
    fn test_resolve_each_kind() {
        assert_eq!(resolve("#say hello"), CommandKind::Say);
        assert_eq!(resolve("#forward 200"), CommandKind::Forward);
        assert_eq!(resolve("#sideways -50"), CommandKind::Sideways);
        assert_eq!(resolve("#turn 90"), CommandKind::Turn);
        assert_eq!(resolve("#turntoward Wall-2.a"), CommandKind::TurnToward);
        assert_eq!(resolve("#drop"), CommandKind::Drop);
        assert_eq!(resolve("#pickup OrangeBarrel.a"), CommandKind::PickUp);
        assert_eq!(resolve("#glow 255 0 0"), CommandKind::Glow);
        assert_eq!(resolve("#doorpass Doorway-2:0.a"), CommandKind::DoorPass);
        assert_eq!(resolve("#pilottoaruco 2"), CommandKind::PilotToAruco);
        assert_eq!(resolve("#camera"), CommandKind::Camera);
    }

    #[test]
    fn test_resolve_missing_payload_still_routes() {
        assert_eq!(resolve("#doorpass"), CommandKind::DoorPass);
        assert_eq!(resolve("#pilottoaruco"), CommandKind::PilotToAruco);
        assert_eq!(resolve("#forward"), CommandKind::Forward);
    }

    #[test]
    fn test_resolve_unrecognized() {
        assert_eq!(resolve("#bogus foo"), CommandKind::Unrecognized);
        assert_eq!(resolve("#drop everything"), CommandKind::Unrecognized);
        assert_eq!(resolve("#camera please"), CommandKind::Unrecognized);
        assert_eq!(resolve("#Forward 10"), CommandKind::Unrecognized);
        assert_eq!(resolve("#"), CommandKind::Unrecognized);
    }

    #[test]
    fn test_table_order() {
        let kinds: Vec<_> = DispatchTable::standard().kinds().collect();
        assert_eq!(kinds, CommandKind::ROUTED.to_vec());
    }

    #[test]
    fn test_payload() {
        assert_eq!(CommandLine::new("#forward 200").payload(), "200");
        assert_eq!(CommandLine::new("#drop").payload(), "");
        assert_eq!(
            CommandLine::say("  indented, with  spacing").payload(),
            "  indented, with  spacing"
        );
        assert_eq!(CommandLine::new("plain text").payload(), "plain text");
    }

    #[test]
    fn test_queue_is_consumed_front_to_back() {
        let mut queue: CommandQueue = ["#forward 1", "#turn 2"]
            .into_iter()
            .map(CommandLine::new)
            .collect();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_line().unwrap().as_str(), "#forward 1");
        assert_eq!(queue.next_line().unwrap().as_str(), "#turn 2");
        assert!(queue.next_line().is_none());
        assert!(queue.is_empty());
    }
}
