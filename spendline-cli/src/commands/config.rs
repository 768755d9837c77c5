//! Config command - show and change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use spendline_core::config::{storage_override, Config, SETTINGS_FILENAME, STORAGE_ENV_VAR};

use super::{get_data_dir, get_logger, log_command, log_event};
use crate::output::{self, create_table};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting: storage, currency or trend-months
    Set {
        key: String,
        value: String,
    },
}

#[derive(Serialize)]
struct ConfigReport {
    storage: String,
    storage_override: Option<String>,
    currency_symbol: String,
    trend_months: usize,
    settings_path: String,
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "config");

    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    match command {
        Some(ConfigCommands::Set { key, value }) => {
            let mut config = Config::load_file(&data_dir)?;
            config.set(&key, &value)?;
            config.save(&data_dir)?;
            log_event(&logger, "config_changed", "config");

            output::success(&format!("✓ {} set to {}", key, value.trim()));
            if key == "storage" {
                if let Some(active) = storage_override()? {
                    output::warning(&format!(
                        "{} is set, so {} storage stays active for now",
                        STORAGE_ENV_VAR, active
                    ));
                }
                output::info("Existing data is not copied between storage backends.");
            }
            Ok(())
        }
        Some(ConfigCommands::Show { json }) => show(&data_dir, json),
        None => show(&data_dir, false),
    }
}

fn show(data_dir: &std::path::Path, json: bool) -> Result<()> {
    let config = Config::load_file(data_dir)?;
    let report = ConfigReport {
        storage: config.storage.to_string(),
        storage_override: storage_override()?.map(|s| s.to_string()),
        currency_symbol: config.currency_symbol,
        trend_months: config.trend_months,
        settings_path: data_dir.join(SETTINGS_FILENAME).display().to_string(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Spendline Settings".bold());
    println!();

    let mut table = create_table();
    let storage = match &report.storage_override {
        Some(active) => format!("{} ({} overrides: {})", report.storage, STORAGE_ENV_VAR, active),
        None => report.storage.clone(),
    };
    table.add_row(vec!["storage", &storage]);
    table.add_row(vec!["currency", &report.currency_symbol]);
    table.add_row(vec!["trend-months", &report.trend_months.to_string()]);
    table.add_row(vec!["File", &report.settings_path]);
    println!("{}", table);

    Ok(())
}
