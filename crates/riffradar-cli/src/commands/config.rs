use anyhow::{Context, Result};
use riffradar_service::{config, Config};

const KEYS: &str = "youtube_api_key, database_path, cache_path, cache_ttl_secs, \
                    enrichment_timeout_secs, max_results, log_level, log_coloured";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in KEYS.split(", ") {
        println!("  {}: {}", key, value_of(config, key)?);
    }

    println!("\nPriority: CLI args > ENV vars (RIFF_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole config file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", value_of(config, &key)?);
        return Ok(());
    }

    let config_path = config::config_file_path();
    if config_path.exists() {
        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        print!("{}", contents);
    } else {
        println!("Config file does not exist: {}", config_path.display());
        println!("\nRun 'riffradar config init' to create it.");
    }

    Ok(())
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "youtube_api_key" => config
            .youtube_api_key
            .as_ref()
            .map_or_else(|| "<not set>".to_string(), |_| "<set>".to_string()),
        "database_path" => config.database_path.display().to_string(),
        "cache_path" => config.cache_path.display().to_string(),
        "cache_ttl_secs" => config.cache_ttl_secs.to_string(),
        "enrichment_timeout_secs" => config.enrichment_timeout_secs.to_string(),
        "max_results" => config.max_results.to_string(),
        "log_level" => config.log_level.clone(),
        "log_coloured" => config.log_coloured.to_string(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS),
    };
    Ok(value)
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure riffradar.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of_known_keys() {
        let config = Config::default();
        for key in KEYS.split(", ") {
            assert!(value_of(&config, key).is_ok(), "key {key} should resolve");
        }
        assert_eq!(value_of(&config, "max_results").unwrap(), "50");
    }

    #[test]
    fn test_api_key_is_masked() {
        let config = Config {
            youtube_api_key: Some("secret".to_string()),
            ..Config::default()
        };
        assert_eq!(value_of(&config, "youtube_api_key").unwrap(), "<set>");
    }

    #[test]
    fn test_unknown_key() {
        let err = value_of(&Config::default(), "colour").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }
}
