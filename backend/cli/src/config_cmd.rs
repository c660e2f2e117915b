//! `mittiscan config show|validate|init`.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;

use mittiscan_config::{
    apply_all_defaults, config_file_path, validate, write_config, MittiConfig, ValidationReport,
};

use crate::config::Config;
use crate::terminal_output::{note_error, note_info, note_success, note_warn};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective config (file merged with built-in tables)
    Show,
    /// Check the reference tables for errors and gaps
    Validate,
    /// Write the built-in tables to the config file as a starting point
    Init {
        /// Replace an existing file (the old one is kept as a backup)
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(cmd: ConfigCommands, config: &Config, file_config: &MittiConfig) -> Result<()> {
    let path = config_file_path(&config.config_dir);
    match cmd {
        ConfigCommands::Show => {
            note_info(&format!("Config file: {}", path.display()));
            note_info(&format!("History database: {}", config.db_path));
            print!("{}", serde_yaml::to_string(file_config)?);
            Ok(())
        }
        ConfigCommands::Validate => {
            let report = validate(file_config);
            print_report(&report);
            if !report.is_valid() {
                bail!("{} has {} error(s)", path.display(), report.errors.len());
            }
            note_success(&format!("{} is valid", path.display()));
            Ok(())
        }
        ConfigCommands::Init { force } => init(&path, force).await,
    }
}

async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to replace it", path.display());
    }
    write_config(&apply_all_defaults(MittiConfig::default()), path).await?;
    note_success(&format!("Wrote built-in tables to {}", path.display()));
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
}
