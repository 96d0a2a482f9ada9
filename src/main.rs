//! Harmonic Mix - a DJ track library with harmonic-mixing suggestions.
//!
//! Tracks are analysed (title, artist, Camelot key, BPM, energy) by a hosted
//! model, edited in place, filtered, sorted and exported as CSV. Selecting a
//! track asks a recommender what to play next; every suggestion is checked
//! against the key, tempo and energy rules before it is shown.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod harmony;
pub mod library;
pub mod model;
pub mod services;
pub mod session;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("harmonic_mix=info".parse()?))
        .init();

    cli::run_command(&args)
}
