use anyhow::{Context, Result};
use nocturne_fetch::config::{self, KEYS};
use nocturne_fetch::Config;
use toml_edit::DocumentMut;

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());

    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    for key in KEYS {
        println!("  {key}: {}", value_of(config, key).unwrap_or_default());
    }
    if config.sources.is_empty() {
        println!("  sources: <none>");
    } else {
        println!("  sources:");
        for source in &config.sources {
            println!("    - {source}");
        }
    }
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (NOCT_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let Some(value) = value_of(config, &key) else {
            anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "));
        };
        println!("{value}");
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'nocturne config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included) intact.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, value)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure nocturne.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

fn value_of(config: &Config, key: &str) -> Option<String> {
    let value = match key {
        "catalog_path" => config.catalog_path.display().to_string(),
        "database_path" => config.database_path.display().to_string(),
        "download_dir" => config.download_dir.display().to_string(),
        "audio_format" => config.audio_format.clone(),
        "yt_dlp_path" => config.yt_dlp_path.display().to_string(),
        "max_concurrent_fetches" => config.max_concurrent_fetches.to_string(),
        _ => return None,
    };
    Some(value)
}

fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    match key {
        "max_concurrent_fetches" => {
            let limit: i64 = value
                .parse()
                .with_context(|| format!("{key} must be a whole number, got {value:?}"))?;
            doc[key] = toml_edit::value(limit);
        }
        _ if KEYS.contains(&key) => {
            doc[key] = toml_edit::value(value);
        }
        _ => {
            anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "));
        }
    }

    Ok(doc.to_string())
}
