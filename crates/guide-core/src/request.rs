//! Typed action requests parsed from command lines.

use std::fmt;

use crate::command::{CommandKind, CommandLine};
use crate::config::GuideConfig;
use crate::error::ParseError;

/// LED color for a glow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowColor {
    Rgb(u8, u8, u8),
    /// Transparent: LEDs off.
    Off,
}

impl GlowColor {
    /// Parses `R G B` argument tokens.
    ///
    /// Anything other than exactly three integers yields [`GlowColor::Off`].
    /// Values outside `0..=255` are clamped.
    pub fn from_args(args: &[&str]) -> Self {
        let [r, g, b] = args else {
            return Self::Off;
        };
        match (channel(r), channel(g), channel(b)) {
            (Some(r), Some(g), Some(b)) => Self::Rgb(r, g, b),
            _ => Self::Off,
        }
    }
}

fn channel(token: &str) -> Option<u8> {
    token
        .parse::<i64>()
        .ok()
        .map(|value| value.clamp(0, u8::MAX as i64) as u8)
}

impl fmt::Display for GlowColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "rgb({}, {}, {})", r, g, b),
            Self::Off => f.write_str("off"),
        }
    }
}

/// A validated request for one command.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    Say { text: String },
    Forward { distance_mm: f64 },
    /// Positive is left, negative is right.
    Sideways { distance_mm: f64 },
    /// Positive is counter-clockwise.
    Turn { angle_deg: f64 },
    TurnToward { object_id: String },
    PickUp { object_id: String },
    Drop,
    Glow(GlowColor),
    Camera,
    DoorPass { doorway: String },
    PilotToMarker { marker_id: String },
}

impl ActionRequest {
    /// Parses a line already routed to `kind`.
    pub fn parse(
        kind: CommandKind,
        line: &CommandLine,
        config: &GuideConfig,
    ) -> Result<Self, ParseError> {
        let request = match kind {
            CommandKind::Say => Self::Say {
                text: line.payload().to_string(),
            },
            CommandKind::Forward => Self::Forward {
                distance_mm: number_arg(kind, line)?,
            },
            CommandKind::Sideways => Self::Sideways {
                distance_mm: number_arg(kind, line)?,
            },
            CommandKind::Turn => Self::Turn {
                angle_deg: number_arg(kind, line)?,
            },
            CommandKind::TurnToward => Self::TurnToward {
                object_id: joined_arg(kind, line)?,
            },
            CommandKind::PickUp => Self::PickUp {
                object_id: joined_arg(kind, line)?,
            },
            CommandKind::Drop => Self::Drop,
            CommandKind::Glow => {
                let args: Vec<&str> = line.tokens().skip(1).collect();
                Self::Glow(GlowColor::from_args(&args))
            }
            CommandKind::Camera => Self::Camera,
            CommandKind::DoorPass => Self::DoorPass {
                doorway: first_arg(kind, line)?.to_string(),
            },
            CommandKind::PilotToAruco => Self::PilotToMarker {
                marker_id: config.marker_id(first_arg(kind, line)?),
            },
            CommandKind::Unrecognized => {
                return Err(ParseError::Unrecognized(line.as_str().to_string()))
            }
        };
        Ok(request)
    }

    /// The command kind this request belongs to.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Say { .. } => CommandKind::Say,
            Self::Forward { .. } => CommandKind::Forward,
            Self::Sideways { .. } => CommandKind::Sideways,
            Self::Turn { .. } => CommandKind::Turn,
            Self::TurnToward { .. } => CommandKind::TurnToward,
            Self::PickUp { .. } => CommandKind::PickUp,
            Self::Drop => CommandKind::Drop,
            Self::Glow(_) => CommandKind::Glow,
            Self::Camera => CommandKind::Camera,
            Self::DoorPass { .. } => CommandKind::DoorPass,
            Self::PilotToMarker { .. } => CommandKind::PilotToAruco,
        }
    }
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Say { text } => write!(f, "say \"{}\"", text),
            Self::Forward { distance_mm } => write!(f, "forward {} mm", distance_mm),
            Self::Sideways { distance_mm } => write!(f, "sideways {} mm", distance_mm),
            Self::Turn { angle_deg } => write!(f, "turn {} deg", angle_deg),
            Self::TurnToward { object_id } => write!(f, "turn toward {}", object_id),
            Self::PickUp { object_id } => write!(f, "pick up {}", object_id),
            Self::Drop => f.write_str("drop"),
            Self::Glow(color) => write!(f, "glow {}", color),
            Self::Camera => f.write_str("camera"),
            Self::DoorPass { doorway } => write!(f, "pass through {}", doorway),
            Self::PilotToMarker { marker_id } => write!(f, "pilot to {}", marker_id),
        }
    }
}

fn first_arg(kind: CommandKind, line: &CommandLine) -> Result<&str, ParseError> {
    line.tokens()
        .nth(1)
        .ok_or(ParseError::MissingArgument { command: kind })
}

fn number_arg(kind: CommandKind, line: &CommandLine) -> Result<f64, ParseError> {
    let token = first_arg(kind, line)?;
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            command: kind,
            token: token.to_string(),
        })
}

/// Remaining tokens concatenated without separators.
fn joined_arg(kind: CommandKind, line: &CommandLine) -> Result<String, ParseError> {
    let joined: String = line.tokens().skip(1).collect();
    if joined.is_empty() {
        return Err(ParseError::MissingArgument { command: kind });
    }
    Ok(joined)
}
