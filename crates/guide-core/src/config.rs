//! Session configuration.

use crate::preamble::MUSEUM_GUIDE_PREAMBLE;

/// Greeting spoken once when a session starts.
pub const DEFAULT_GREETING: &str = "Very nice to meet you. I am this art museum's guide.";

/// Instruction sent along with a captured camera image.
pub const DEFAULT_CAMERA_INSTRUCTION: &str = "Please respond to the query using the camera image.";

/// Prefix of world-map identifiers for ArUco markers.
pub const DEFAULT_MARKER_PREFIX: &str = "ArucoMarker-";

/// Suffix appended when a bare marker number is given.
pub const DEFAULT_MARKER_SUFFIX: &str = ".a";

/// Standoff used when piloting to a marker, in millimeters.
pub const DEFAULT_MARKER_STANDOFF_MM: f64 = -100.0;

/// Maximum chained camera follow-ups for one utterance.
pub const DEFAULT_CAMERA_FOLLOWUP_LIMIT: usize = 3;

/// Configuration for a conversation session.
///
/// Passed in once at construction; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideConfig {
    /// Spoken once at session start.
    pub greeting: String,
    /// Handed to the planner once at session start.
    pub preamble: String,
    /// Follow-up instruction for the camera subflow.
    pub camera_instruction: String,
    /// Identifier prefix for marker objects.
    pub marker_prefix: String,
    /// Identifier suffix added to bare marker numbers.
    pub marker_suffix: String,
    /// Offset along the marker heading for the piloting goal.
    pub marker_standoff_mm: f64,
    /// How many camera follow-ups one utterance may chain.
    pub camera_followup_limit: usize,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            preamble: MUSEUM_GUIDE_PREAMBLE.to_string(),
            camera_instruction: DEFAULT_CAMERA_INSTRUCTION.to_string(),
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            marker_standoff_mm: DEFAULT_MARKER_STANDOFF_MM,
            camera_followup_limit: DEFAULT_CAMERA_FOLLOWUP_LIMIT,
        }
    }
}

impl GuideConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the planner preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Sets the camera follow-up instruction.
    pub fn with_camera_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.camera_instruction = instruction.into();
        self
    }

    /// Sets the marker standoff distance.
    pub fn with_marker_standoff(mut self, standoff_mm: f64) -> Self {
        self.marker_standoff_mm = standoff_mm;
        self
    }

    /// Sets the camera follow-up limit.
    pub fn with_camera_followup_limit(mut self, limit: usize) -> Self {
        self.camera_followup_limit = limit;
        self
    }

    /// Expands a marker argument into a world-map identifier.
    ///
    /// Full identifiers pass through; bare numbers get the prefix and suffix.
    pub fn marker_id(&self, arg: &str) -> String {
        if arg.starts_with(&self.marker_prefix) {
            arg.to_string()
        } else {
            format!("{}{}{}", self.marker_prefix, arg, self.marker_suffix)
        }
    }
}
