//! Language-model planner gateway for the museum guide.
//!
//! [`ChatPlanner`] implements [`guide_core::Planner`] on top of an
//! OpenRouter-compatible chat completions endpoint.
//!
//! # Example
//!
//! ```ignore
//! use guide_core::Planner;
//! use guide_planner::{ChatPlanner, PlannerConfig};
//!
//! let mut planner = ChatPlanner::new(PlannerConfig::from_env());
//! planner.set_preamble("You are a museum guide robot.");
//! let reply = planner.ask("What is this painting?").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{data_url, ChatMessage, ChatPlanner, ContentPart, MessageContent};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
