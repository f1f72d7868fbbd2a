use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use riffradar_service::Config;
use twyg::{LogLevel, OptsBuilder};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "riffradar", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the song database (default: ~/.local/share/riffradar/songs.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Load songs into the catalog
    ///
    /// Reads a JSON array of songs, each an object with `song_id`,
    /// `song_name`, `artist`, `chords`, and `difficulty` (beginner,
    /// intermediate, or advanced). Without --file the bundled starter
    /// catalog is used.
    ///
    /// Seeding is skipped when the catalog already has songs, unless
    /// --reset is given, in which case the catalog is emptied first.
    /// Songs that fail to load are reported and the rest still load.
    Seed {
        /// JSON song file (default: bundled catalog)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Empty the catalog before seeding
        #[arg(long)]
        reset: bool,
    },
    /// Recommend songs with a similar chord progression
    ///
    /// Chords are matched by root (circle-of-fifths position) and quality
    /// (major, minor, seventh, suspended). Only the first 8 chords count.
    /// Songs scoring 0.3 or less are not shown.
    ///
    /// When a YouTube API key is configured, each song comes with a
    /// tutorial link.
    Recommend {
        /// Chord symbols, in order (e.g. C G Am F)
        #[arg(required = true)]
        chords: Vec<String>,

        /// Number of neighbors to consider (default: max_results from config)
        #[arg(long, short = 'n')]
        max_results: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Skip tutorial lookups
        #[arg(long)]
        no_tutorials: bool,
    },
    /// Show catalog statistics
    Stats,
    /// Check that the song index and query cache are reachable
    Health {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage the query cache
    #[command(subcommand)]
    Cache(CacheCommands),
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum CacheCommands {
    /// Drop every cached recommendation
    Clear,
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print one config value, or the whole config file
    Get {
        /// Config key (e.g. database_path)
        key: Option<String>,
    },
    /// Create the config file with defaults
    Init,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
}

fn parse_level(level: &str) -> Result<LogLevel> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LogLevel::Trace),
        "debug" => Ok(LogLevel::Debug),
        "info" => Ok(LogLevel::Info),
        "warn" | "warning" => Ok(LogLevel::Warn),
        "error" => Ok(LogLevel::Error),
        other => Err(anyhow!("Unknown log level: {other}")),
    }
}

fn setup_logging(config: &Config) -> Result<()> {
    let opts = OptsBuilder::new()
        .coloured(config.log_coloured)
        .level(parse_level(&config.log_level)?)
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {e:?}"))?;

    twyg::setup(opts).map_err(|e| anyhow!("Could not set up logging: {e:?}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db_path) => Config::load_with_db_path(db_path)?,
        None => Config::load()?,
    };

    setup_logging(&config)?;

    match cli.command {
        Commands::Seed { file, reset } => {
            commands::run_seed(&config, file, reset)?;
        }
        Commands::Recommend {
            chords,
            max_results,
            json,
            no_tutorials,
        } => {
            let max_results = max_results.unwrap_or(config.max_results);
            commands::run_recommend(&config, &chords, max_results, json, !no_tutorials).await?;
        }
        Commands::Stats => {
            commands::show_stats(&config)?;
        }
        Commands::Health { json } => {
            commands::show_health(&config, json)?;
        }
        Commands::Cache(CacheCommands::Clear) => {
            commands::clear_cache(&config)?;
        }
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::show_config(&config)?,
            ConfigCommands::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommands::Init => commands::config::init_config()?,
            ConfigCommands::Path => commands::config::show_path(),
            ConfigCommands::Example => commands::config::show_example(),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::try_parse_from(["riffradar", "recommend", "C", "G", "Am", "F", "-n", "5"])
            .unwrap();
        match cli.command {
            Commands::Recommend {
                chords,
                max_results,
                json,
                no_tutorials,
            } => {
                assert_eq!(chords, vec!["C", "G", "Am", "F"]);
                assert_eq!(max_results, Some(5));
                assert!(!json);
                assert!(!no_tutorials);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_recommend_requires_chords() {
        assert!(Cli::try_parse_from(["riffradar", "recommend"]).is_err());
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["riffradar", "stats", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_parse_level() {
        assert!(matches!(parse_level("DEBUG"), Ok(LogLevel::Debug)));
        assert!(matches!(parse_level("warning"), Ok(LogLevel::Warn)));
        assert!(parse_level("loud").is_err());
    }
}
