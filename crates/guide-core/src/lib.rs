//! Conversation core for the museum guide robot.
//!
//! This crate turns language-model planner text into robot behavior. A
//! planner response is either spoken as-is or, when it carries `#command`
//! lines, split into a queue that is executed one command at a time against
//! the robot's capabilities.
//!
//! # Key Concepts
//!
//! - **Classifier**: tells plain speech from command responses
//! - **DispatchTable**: routes a marked line to its command kind, first match wins
//! - **Sequencer**: drains a queue, recovering locally from every failure
//! - **Conversation**: greeting, planner turns and the camera follow-up loop
//!
//! The planner, actuator, world map, speaker and listener are traits (see
//! [`traits`] and [`world`]). Recording doubles for tests live in `mock`,
//! behind the `test-util` feature.
//!
//! # Example
//!
//! ```
//! use guide_core::{classify, Classification};
//!
//! let response = "#forward 200\nLet me see that.\n#turn 90";
//! match classify(response) {
//!     Classification::Commands(queue) => {
//!         let lines: Vec<&str> = queue.iter().map(|l| l.as_str()).collect();
//!         assert_eq!(lines, ["#forward 200", "#say Let me see that.", "#turn 90"]);
//!     }
//!     Classification::Speech(_) => unreachable!(),
//! }
//! ```

pub mod classifier;
pub mod command;
pub mod config;
pub mod conversation;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod outcome;
pub mod patterns;
pub mod pose;
pub mod preamble;
pub mod request;
pub mod sequencer;
pub mod traits;
pub mod world;

pub use classifier::{classify, Classification};
pub use command::{CommandKind, CommandLine, CommandQueue, DispatchTable, COMMAND_MARKER};
pub use config::GuideConfig;
pub use conversation::Conversation;
pub use error::{ActuationError, GuideError, ParseError, Result};
pub use outcome::{ActionOutcome, FailureReason, Recovery};
pub use patterns::Pattern;
pub use pose::Pose;
pub use preamble::MUSEUM_GUIDE_PREAMBLE;
pub use request::{ActionRequest, GlowColor};
pub use sequencer::{SequenceEnd, Sequencer, Step, TurnReport};
pub use traits::{ActuationResult, Actuator, CapturedImage, Listener, Planner, Speaker};
pub use world::{ObjectKind, WorldMap, WorldObject};
