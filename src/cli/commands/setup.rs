//! Config inspection and initialisation.

use crate::config::{self, Config};

use super::{Cli, resolve_api_key};

/// Print the effective configuration; with `init`, write the defaults to the
/// config file first if it does not exist yet.
pub fn cmd_config(cli: &Cli, config: &Config, init: bool) -> anyhow::Result<()> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => config::config_path(),
    };

    if init {
        let Some(path) = &path else {
            return Err(crate::error::Error::config("could not determine config directory").into());
        };
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            let written = match &cli.config {
                Some(explicit) => {
                    config::save_to(&Config::default(), explicit)?;
                    explicit.clone()
                }
                None => config::save(&Config::default())?,
            };
            println!("Wrote default config to {}", written.display());
        }
    }

    match &path {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created, using defaults)", path.display()),
        None => println!("Config file: (no config directory, using defaults)"),
    }

    let key = resolve_api_key(cli, config);
    println!("\n[services]");
    println!("  gemini api key:     {}", key.as_deref().map_or("(not set)".to_string(), mask));
    println!("  base url:           {}", config.services.base_url);
    println!("  analysis model:     {}", config.services.analysis_model);
    println!("  suggestion model:   {}", config.services.recommendation_model);
    println!("  request timeout:    {}s", config.services.request_timeout_secs);
    println!("  request spacing:    {}ms", config.services.min_request_interval_ms);
    println!("\n[analysis]");
    println!("  concurrency:        {}", config.analysis.concurrency);
    println!("\n[recommendation]");
    println!("  max suggestions:    {}", config.recommendation.session_options().max_suggestions);
    println!("  rerank by harmony:  {}", config.recommendation.rerank_by_harmony);
    println!(
        "  backend:            {}",
        if key.is_none() || cli.offline || config.recommendation.offline {
            "local harmonic rules"
        } else {
            "gemini"
        }
    );
    Ok(())
}

/// Show only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
