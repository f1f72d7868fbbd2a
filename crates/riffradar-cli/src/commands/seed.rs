use anyhow::{Context, Result};
use std::path::PathBuf;

use riffradar_service::seed::{load_songs, parse_songs, DEFAULT_SONGS};
use riffradar_service::Config;

use super::open_recommender;

pub fn run_seed(config: &Config, file: Option<PathBuf>, reset: bool) -> Result<()> {
    let songs = match &file {
        Some(path) => load_songs(path)
            .with_context(|| format!("Failed to load songs from {}", path.display()))?,
        None => parse_songs(DEFAULT_SONGS).context("Bundled catalog is invalid")?,
    };

    let recommender = open_recommender(config, false)?;
    let summary = riffradar_service::seed(&recommender, songs, reset)?;

    if summary.skipped {
        println!(
            "Catalog already has {} songs; nothing to do (use --reset to reseed)",
            summary.total
        );
        return Ok(());
    }

    println!("\n✓ Seeding complete\n");
    println!("  Added:    {}", summary.succeeded);
    println!("  Failed:   {}", summary.failed);
    println!("  In index: {}", summary.total);
    println!("  Database: {}", config.database_path.display());

    Ok(())
}
