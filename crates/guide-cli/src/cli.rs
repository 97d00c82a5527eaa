//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Museum guide - a robot tour guide driven by a language-model planner
#[derive(Parser, Debug)]
#[command(name = "museum-guide")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// World map JSON file for the simulated robot
    #[arg(short, long, env = "GUIDE_WORLD")]
    pub world: Option<PathBuf>,

    /// Image file returned by the simulated camera
    #[arg(long, env = "GUIDE_CAMERA_IMAGE")]
    pub camera_image: Option<PathBuf>,

    /// File whose contents replace the built-in planner preamble
    #[arg(long)]
    pub preamble: Option<PathBuf>,

    /// Planner model (overrides GUIDE_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Greeting spoken when the session starts
    #[arg(long)]
    pub greeting: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Talk to the guide interactively (default)
    Chat,

    /// Show how a planner response would be interpreted, without running it
    Classify {
        /// Response text; read from stdin when omitted
        text: Option<String>,
    },
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Directory for REPL history.
    pub fn state_dir(&self) -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".museum-guide"))
            .unwrap_or_else(|| PathBuf::from(".museum-guide"))
    }
}

/// Expands a leading `~` in a user-supplied path.
pub fn expand_path(path: &std::path::Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}
