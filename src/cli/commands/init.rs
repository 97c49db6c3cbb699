use std::{fs, path::Path};

use anyhow::Result;
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json};

pub fn init() -> Result<ExitStatus> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    fs::write(config_path, default_config_json()?)?;
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    let dictionaries_dir = Config::default().unmerged_dictionaries_dir;
    if !Path::new(&dictionaries_dir).is_dir() {
        eprintln!(
            "{} {} does not exist yet; build your dictionaries before running lookups",
            "note:".bold(),
            dictionaries_dir.cyan()
        );
    }

    Ok(ExitStatus::Success)
}
