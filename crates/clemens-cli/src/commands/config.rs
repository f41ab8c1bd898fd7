use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use clemens_config::{ClemensConfig, ConfigLoader};

use crate::cli::ConfigCommands;

/// Execute config subcommand
pub fn execute(cmd: ConfigCommands, config: &ClemensConfig, loaded_from: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => init(path, force),
        ConfigCommands::Show { format } => show(config, loaded_from, &format),
    }
}

/// Write the commented example config
fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path
        .or_else(ConfigLoader::default_config_path)
        .context("Could not determine config file path")?;

    if config_path.exists() && !force {
        println!(
            "{} Config file already exists at: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        println!("Use {} to overwrite", "--force".yellow());
        return Ok(());
    }

    ConfigLoader::write_example(&config_path)?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    println!(
        "\n{}",
        "Edit this file to tune extraction and export settings.".dimmed()
    );
    Ok(())
}

/// Print the effective configuration after file and environment overrides
fn show(config: &ClemensConfig, loaded_from: Option<&Path>, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(config)?,
        "toml" => toml::to_string_pretty(config)?,
        other => bail!("Unknown format '{}': expected toml or json", other),
    };

    let source = loaded_from
        .map(Path::to_path_buf)
        .or_else(|| ConfigLoader::default_config_path().filter(|p| p.exists()));
    match source {
        Some(path) => eprintln!("{}", format!("# from {}", path.display()).dimmed()),
        None => eprintln!("{}", "# built-in defaults".dimmed()),
    }
    println!("{}", rendered);
    Ok(())
}
