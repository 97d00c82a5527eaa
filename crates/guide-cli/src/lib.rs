//! Museum guide CLI library.
//!
//! Runs a guide session in the terminal: utterances are typed, speech is
//! printed, and a simulated robot stands in for the hardware.

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod sim;
