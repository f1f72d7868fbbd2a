use anyhow::Result;

use riffradar_service::Config;

use super::open_recommender;

pub fn clear_cache(config: &Config) -> Result<()> {
    let recommender = open_recommender(config, false)?;
    let removed = recommender.cache().invalidate_all();

    println!("✓ Cleared {} cached quer{}", removed, if removed == 1 { "y" } else { "ies" });
    println!("  in {}", config.cache_path.display());
    Ok(())
}
