use crate::cli::ConfigCommands;
use crate::config::{CliConfig, CONFIG_KEYS};
use crate::error::Result;
use colored::Colorize;
use serde_json::json;

pub fn handle_config_command(command: ConfigCommands, json_output: bool) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            let config_path = CliConfig::config_file_path()?;

            if config_path.exists() && !force {
                if json_output {
                    let output = json!({
                        "success": false,
                        "error": "Configuration file already exists. Use --force to overwrite.",
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    println!(
                        "{} Configuration file already exists at: {}",
                        "!".yellow(),
                        config_path.display()
                    );
                    println!("Use --force to overwrite.");
                }
                return Ok(());
            }

            CliConfig::with_defaults().save_to(&config_path)?;

            if json_output {
                let output = json!({
                    "success": true,
                    "path": config_path,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{} Configuration initialized at: {}",
                    "✓".green(),
                    config_path.display()
                );
            }
        }

        ConfigCommands::Set { key, value } => {
            let mut config = CliConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;

            if json_output {
                let output = json!({
                    "success": true,
                    "key": key,
                    "value": value,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{} Set {key} = {value}", "✓".green());
            }
        }

        ConfigCommands::Get { key } => {
            let config = CliConfig::load()?;

            if let Some(key) = key {
                let value = config.get(&key)?;

                if json_output {
                    let output = json!({ key: value });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    println!("{key} = {}", value.as_deref().unwrap_or("(not set)"));
                }
            } else if json_output {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", "Configuration:".bright_cyan());
                for key in CONFIG_KEYS {
                    let value = config.get(key)?;
                    println!("  {key}: {}", value.as_deref().unwrap_or("(default)"));
                }
            }
        }

        ConfigCommands::Path => {
            let path = CliConfig::config_file_path()?;

            if json_output {
                let output = json!({
                    "config_path": path,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
