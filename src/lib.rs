//! SimHelper
//!
//! Command-line manager for iOS simulators. The domain logic lives in the
//! workspace crates; this crate holds argument parsing and headless output.

pub mod cli;
pub mod headless;

// Re-export main entry points
pub use headless::runner::{run, run_command, Outcome, Output};
