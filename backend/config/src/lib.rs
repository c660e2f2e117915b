//! `mittiscan-config`: reference tables and runtime settings.
//!
//! Provides:
//! - Typed schema for crop standards, soil ranges, fertilizer mapping, prices
//! - Built-in tables used when the config file leaves a gap
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, builtin_reference_tables};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{
    CropStandard, FertilizerProduct, LoggingConfig, MittiConfig, NutrientRange, PhRange,
    PhThresholds, ReferenceTables, SoilRangeTable, StorageConfig, PH_LOW_KEY,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Load, substitute env vars, apply defaults and validate a config file.
///
/// This is the main entry point at process start. Warnings are logged;
/// any validation error fails the load, since the tables feed every
/// recommendation.
pub async fn load_and_prepare(path: &Path) -> Result<MittiConfig> {
    let config = prepare(load_config(path).await?)?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Substitute `${VAR}` references and fill defaults, without validating.
pub fn prepare(raw_config: MittiConfig) -> Result<MittiConfig> {
    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: MittiConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    Ok(apply_all_defaults(config))
}

/// Validate a prepared config, logging every finding. Fails on any error.
pub fn ensure_valid(config: &MittiConfig) -> Result<ValidationReport> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!(
            "{} config error(s), first: {}",
            report.errors.len(),
            report.errors[0]
        );
    }

    Ok(report)
}
