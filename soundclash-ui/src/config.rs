//! Configuration loading
//!
//! Resolution priority: command-line argument, then environment variable
//! (clap handles both), then the optional TOML config file, then the
//! compiled default.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use soundclash_common::{Error, Result};

/// Command-line arguments for soundclash-ui
#[derive(Parser, Debug)]
#[command(name = "soundclash-ui")]
#[command(about = "Battle voting server")]
#[command(version)]
pub struct Args {
    /// HTTP listen address
    #[arg(long, env = "SOUNDCLASH_LISTEN")]
    pub listen: Option<String>,

    /// Database file
    #[arg(long, env = "SOUNDCLASH_DB")]
    pub db: Option<PathBuf>,

    /// Directory containing one subdirectory per battle
    #[arg(long, env = "SOUNDCLASH_BATTLES_DIR")]
    pub battles_dir: Option<PathBuf>,

    /// API key for administrative commands
    #[arg(long, env = "SOUNDCLASH_API_KEY")]
    pub api_key: Option<String>,

    /// Always allow voting and results, ignoring closed/hidden flags
    #[arg(long, env = "SOUNDCLASH_UNRESTRICTED")]
    pub unrestricted: bool,

    /// Include score numbers in results responses
    #[arg(long, env = "SOUNDCLASH_SHOW_SCORES")]
    pub show_scores: bool,

    /// Order the full results by score instead of the neutral listing
    #[arg(long, env = "SOUNDCLASH_FULL_RESULTS_ORDER")]
    pub full_results_order: bool,

    /// TOML config file supplying defaults for the options above
    #[arg(long, env = "SOUNDCLASH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Optional config file contents; every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub listen: Option<String>,
    pub db: Option<PathBuf>,
    pub battles_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub unrestricted: Option<bool>,
    pub show_scores: Option<bool>,
    pub full_results_order: Option<bool>,
}

/// Presentation behavior toggles, passed into request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerConfig {
    pub unrestricted: bool,
    pub show_scores: bool,
    pub full_results_order: bool,
}

/// Fully resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub db: PathBuf,
    pub battles_dir: PathBuf,
    pub api_key: String,
    pub server: ServerConfig,
}

impl Config {
    pub fn resolve(args: Args) -> Result<Config> {
        let file = match &args.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read config file {}: {e}", path.display()))
                })?;
                toml::from_str::<FileConfig>(&raw)
                    .map_err(|e| Error::Config(format!("invalid config file: {e}")))?
            }
            None => FileConfig::default(),
        };

        Ok(Config {
            listen: args
                .listen
                .or(file.listen)
                .unwrap_or_else(|| "127.0.0.1:8899".to_string()),
            db: args
                .db
                .or(file.db)
                .unwrap_or_else(|| PathBuf::from("soundclash.db")),
            battles_dir: args
                .battles_dir
                .or(file.battles_dir)
                .unwrap_or_else(|| PathBuf::from("battles/")),
            api_key: args.api_key.or(file.api_key).unwrap_or_default(),
            server: ServerConfig {
                unrestricted: args.unrestricted || file.unrestricted.unwrap_or(false),
                show_scores: args.show_scores || file.show_scores.unwrap_or(false),
                full_results_order: args.full_results_order
                    || file.full_results_order.unwrap_or(false),
            },
        })
    }
}
