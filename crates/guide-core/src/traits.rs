//! Capability interfaces for the guide's external collaborators.
//!
//! The conversation core never talks to hardware, the network or a terminal
//! directly. It is handed implementations of these traits:
//!
//! - [`Planner`] - the language-model gateway
//! - [`Actuator`] - motion, gripper, lighting, camera, doorways, piloting
//! - [`Speaker`] - the text-to-speech sink
//! - [`Listener`] - the source of human utterances
//!
//! The world-map lookup lives in [`crate::world::WorldMap`].

use async_trait::async_trait;

use crate::error::{ActuationError, Result};
use crate::pose::Pose;
use crate::request::GlowColor;

/// Result of an actuation primitive.
pub type ActuationResult = std::result::Result<(), ActuationError>;

/// An image produced by the camera primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `image/jpeg`.
    pub media_type: String,
}

impl CapturedImage {
    /// Creates a captured image.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }
}

/// Language-model planner gateway.
#[async_trait]
pub trait Planner: Send {
    /// Sets the instructions that precede every conversation turn.
    fn set_preamble(&mut self, preamble: &str);

    /// Asks the planner to respond to a human utterance.
    async fn ask(&mut self, utterance: &str) -> Result<String>;

    /// Asks the planner to respond using a captured image.
    async fn ask_with_image(&mut self, instruction: &str, image: &CapturedImage) -> Result<String>;
}

/// Physical and sensing primitives of the robot.
///
/// Each call resolves once the primitive has finished.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Moves straight ahead; negative distances move backwards.
    async fn move_forward(&self, distance_mm: f64) -> ActuationResult;

    /// Moves left; negative distances move right.
    async fn move_sideways(&self, distance_mm: f64) -> ActuationResult;

    /// Turns counter-clockwise; negative angles turn clockwise.
    async fn turn(&self, angle_deg: f64) -> ActuationResult;

    async fn turn_toward(&self, object_id: &str) -> ActuationResult;

    async fn pick_up(&self, object_id: &str) -> ActuationResult;

    /// Releases whatever is held.
    async fn drop_object(&self) -> ActuationResult;

    async fn set_glow(&self, color: GlowColor) -> ActuationResult;

    async fn capture_image(&self) -> std::result::Result<CapturedImage, ActuationError>;

    async fn pass_doorway(&self, doorway: &str) -> ActuationResult;

    /// Travels to `goal`. Unreachable goals fail with
    /// [`ActuationError::GoalUnreachable`].
    async fn pilot_to_pose(&self, goal: Pose) -> ActuationResult;
}

/// Text-to-speech sink.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Source of human utterances.
#[async_trait]
pub trait Listener: Send {
    /// Waits for the next utterance; `None` once the source is closed.
    async fn hear(&mut self) -> Result<Option<String>>;
}
