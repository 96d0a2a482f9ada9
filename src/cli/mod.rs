//! Command-line interface for harmonic-mix.
//!
//! One-shot commands for analyzing files, asking for suggestions, checking
//! transitions and exporting, plus an interactive shell that drives a full
//! session.

mod commands;
mod render;

pub use commands::{Cli, Commands, run_command};
