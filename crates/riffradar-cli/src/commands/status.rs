use anyhow::Result;

use riffradar_service::Config;

use super::open_recommender;

pub fn show_stats(config: &Config) -> Result<()> {
    let recommender = open_recommender(config, false)?;
    let stats = recommender.stats()?;

    println!("\n📊 RiffRadar Status\n");
    println!("  Database: {}", config.database_path.display());
    println!("  Songs: {}", stats.total_songs);

    if stats.total_songs == 0 {
        println!("\n  Run `riffradar seed` to load the starter catalog");
    }

    Ok(())
}

pub fn show_health(config: &Config, json: bool) -> Result<()> {
    let recommender = open_recommender(config, false)?;
    let health = recommender.health();

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    println!(
        "  {} Song index ({})",
        mark(health.index_available),
        config.database_path.display()
    );
    println!(
        "  {} Query cache ({})",
        mark(health.cache_available),
        config.cache_path.display()
    );
    match health.total_songs {
        Some(count) => println!("  Songs: {count}"),
        None => println!("  Songs: unknown"),
    }

    if !health.index_available {
        anyhow::bail!("Song index is unavailable");
    }
    Ok(())
}
