//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `analyze`: run the analyzer over files
//! - `suggest`: one-shot suggestions and the compatibility checker
//! - `export`: filtered/sorted CSV export of a seed library
//! - `setup`: show or initialise the config file
//! - `shell`: the interactive session (default when no subcommand is given)

mod analyze;
mod export;
mod setup;
mod shell;
mod suggest;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::ResultExt;
use crate::library::demo_tracks;
use crate::model::{Track, TrackField};
use crate::services::{Analyzer, GeminiClient, HarmonicRecommender, Recommender, Unconfigured};
use crate::session::{Controller, SessionState};

pub use analyze::cmd_analyze;
pub use export::cmd_export;
pub use setup::cmd_config;
pub use shell::cmd_shell;
pub use suggest::{cmd_compat, cmd_suggest};

/// Harmonic Mix CLI
#[derive(Parser)]
#[command(author, version, about = "DJ track library with harmonic-mixing suggestions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini API key (or set GEMINI_API_KEY / API_KEY)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Suggest with the local harmonic rules instead of Gemini
    #[arg(long, global = true)]
    pub offline: bool,
}

/// Where the starting library comes from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// CSV file in export format to seed the library with
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Include the built-in demo tracks
    #[arg(long)]
    pub demo: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze files and print the resulting tracks
    Analyze {
        /// File names or paths to analyze
        #[arg(required = true)]
        files: Vec<String>,
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Suggest what to play after a track
    Suggest {
        #[command(flatten)]
        seed: SeedArgs,
        /// Id (file name) of the current track
        #[arg(short, long)]
        track: String,
    },
    /// Check the harmonic compatibility of a transition
    Compat {
        /// Camelot key of the current track, e.g. 8A
        from: String,
        /// Camelot key of the next track
        to: String,
        /// Tempos of both tracks
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        bpm: Option<Vec<f64>>,
        /// Energy levels of both tracks
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        energy: Option<Vec<u8>>,
    },
    /// Export a filtered and sorted library as CSV
    Export {
        #[command(flatten)]
        seed: SeedArgs,
        /// Key substring filter (case-insensitive)
        #[arg(long, default_value = "")]
        key: String,
        #[arg(long)]
        bpm_min: Option<f64>,
        #[arg(long)]
        bpm_max: Option<f64>,
        #[arg(long)]
        energy_min: Option<u8>,
        #[arg(long)]
        energy_max: Option<u8>,
        /// Sort field: title, artist, key, bpm or energy
        #[arg(long)]
        sort: Option<TrackField>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Interactive session
    Shell {
        #[command(flatten)]
        seed: SeedArgs,
    },
}

/// Run the specified CLI command. With no subcommand, starts the shell.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    };

    match &cli.command {
        Some(Commands::Compat { from, to, bpm, energy }) => cmd_compat(from, to, bpm.as_deref(), energy.as_deref()),
        Some(Commands::Export {
            seed,
            key,
            bpm_min,
            bpm_max,
            energy_min,
            energy_max,
            sort,
            desc,
            output,
        }) => {
            let filter = crate::library::FilterCriteria {
                key: key.clone(),
                bpm: crate::library::Bounds::new(*bpm_min, *bpm_max),
                energy: crate::library::Bounds::new(*energy_min, *energy_max),
            };
            cmd_export(load_seed(seed)?, filter, *sort, *desc, output.as_deref())
        }
        Some(Commands::Config { init }) => cmd_config(cli, &config, *init),
        Some(Commands::Analyze { files, csv }) => {
            let rt = Runtime::new()?;
            cmd_analyze(&rt, session(cli, &config, Vec::new())?, files, *csv)
        }
        Some(Commands::Suggest { seed, track }) => {
            let rt = Runtime::new()?;
            cmd_suggest(&rt, session(cli, &config, load_seed(seed)?)?, track)
        }
        Some(Commands::Shell { seed }) => {
            let rt = Runtime::new()?;
            cmd_shell(&rt, session(cli, &config, load_seed(seed)?)?)
        }
        None => {
            let rt = Runtime::new()?;
            cmd_shell(&rt, session(cli, &config, Vec::new())?)
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// API key from the command line, `GEMINI_API_KEY`, `API_KEY` or the config
/// file, in that order.
pub(crate) fn resolve_api_key(cli: &Cli, config: &Config) -> Option<String> {
    cli.api_key
        .clone()
        .or_else(|| std::env::var("API_KEY").ok())
        .or_else(|| config.credentials.gemini_api_key.clone())
        .filter(|k| !k.trim().is_empty())
}

/// Build the analyzer and recommender for this run.
pub(crate) fn collaborators(cli: &Cli, config: &Config) -> anyhow::Result<(Arc<dyn Analyzer>, Arc<dyn Recommender>)> {
    let offline = cli.offline || config.recommendation.offline;
    let local: Arc<dyn Recommender> = Arc::new(HarmonicRecommender::new(config.recommendation.max_suggestions));

    let Some(api_key) = resolve_api_key(cli, config) else {
        tracing::info!("No Gemini API key configured; analysis is unavailable and suggestions use the local rules");
        let analyzer: Arc<dyn Analyzer> = Arc::new(Unconfigured::new("set GEMINI_API_KEY or credentials.gemini_api_key"));
        return Ok((analyzer, local));
    };

    let client = Arc::new(GeminiClient::new(config.services.gemini(api_key))?);
    let recommender: Arc<dyn Recommender> = if offline { local } else { client.clone() as Arc<dyn Recommender> };
    let analyzer: Arc<dyn Analyzer> = client;
    Ok((analyzer, recommender))
}

/// A controller seeded with `tracks`, wired to this run's collaborators.
pub(crate) fn session(cli: &Cli, config: &Config, tracks: Vec<Track>) -> anyhow::Result<Controller> {
    let (analyzer, recommender) = collaborators(cli, config)?;
    let mut state = SessionState::new(config.recommendation.session_options());
    crate::session::update(&mut state, crate::session::Message::SeedTracks(tracks));
    Ok(Controller::new(state, analyzer, recommender).with_analysis_concurrency(config.analysis.concurrency))
}

/// Tracks from `--demo` and/or `--seed`.
pub(crate) fn load_seed(args: &SeedArgs) -> anyhow::Result<Vec<Track>> {
    let mut tracks = if args.demo { demo_tracks() } else { Vec::new() };
    if let Some(path) = &args.seed {
        tracks.extend(read_seed_file(path)?);
    }
    Ok(tracks)
}

pub(crate) fn read_seed_file(path: &Path) -> crate::error::Result<Vec<Track>> {
    let text = crate::error::read_to_string(path)?;
    crate::export::tracks_from_csv(&text).with_context(format!("loading {}", path.display()))
}
