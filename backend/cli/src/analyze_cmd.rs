//! `mittiscan analyze`: reading + crop → report, recorded in history.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use mittiscan_advisor::Advisor;
use mittiscan_core::{AnalysisRequest, AreaUnit, Nutrient, SoilReading, DEFAULT_FARM_SIZE};
use mittiscan_logging::{AnalysisEvent, EventLogger};
use mittiscan_store::{ScanRecord, ScanStore};

use crate::terminal_output::{format_rupees, note_info, note_success, note_warn};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Crop key, e.g. wheat, rice, cotton
    #[arg(long)]
    pub crop: String,

    /// Farm area (hectares unless --acres)
    #[arg(long, default_value_t = DEFAULT_FARM_SIZE)]
    pub farm_size: f64,

    /// Farm area is given in acres
    #[arg(long)]
    pub acres: bool,

    /// JSON file with the reading: `mittiscan scan` output or a bare `{N, P, K, OC, pH}`
    #[arg(long, conflicts_with_all = ["n", "p", "k", "oc", "ph"])]
    pub soil: Option<PathBuf>,

    /// Available nitrogen, kg/ha
    #[arg(long)]
    pub n: Option<f64>,

    /// Available phosphorus, kg/ha
    #[arg(long)]
    pub p: Option<f64>,

    /// Available potassium, kg/ha
    #[arg(long)]
    pub k: Option<f64>,

    /// Organic carbon, %
    #[arg(long)]
    pub oc: Option<f64>,

    /// Soil pH
    #[arg(long)]
    pub ph: Option<f64>,

    /// Do not record the analysis in history
    #[arg(long)]
    pub no_save: bool,
}

impl AnalyzeArgs {
    fn reading_from_flags(&self) -> SoilReading {
        SoilReading {
            n: self.n,
            p: self.p,
            k: self.k,
            oc: self.oc,
            ph: self.ph,
        }
    }

    fn unit(&self) -> AreaUnit {
        if self.acres {
            AreaUnit::Acres
        } else {
            AreaUnit::Hectares
        }
    }
}

pub async fn run(
    args: &AnalyzeArgs,
    advisor: &Advisor,
    store: Option<&ScanStore>,
    request_id: &str,
) -> Result<()> {
    let soil = match &args.soil {
        Some(path) => read_soil_file(path).await?,
        None => args.reading_from_flags(),
    };
    if soil.is_empty() {
        bail!("No soil values given; pass --soil <file> or at least one of --n, --p, --k, --oc, --ph");
    }
    let missing = soil.unresolved();
    if !missing.is_empty() {
        note_warn(&format!("No value for {}; those fields are skipped", symbols(&missing)));
    }

    let request = AnalysisRequest::new(soil, args.crop.clone(), args.farm_size).with_unit(args.unit());
    let report = advisor.analyze(&request)?;

    if advisor.tables().crop(&request.crop).is_none() {
        note_warn(&format!("Unknown crop '{}'; no deficiencies computed", request.crop));
    }

    EventLogger::log_event(
        request_id,
        AnalysisEvent::AnalysisCompleted {
            crop: request.crop.clone(),
            farm_size_ha: request.farm_size_hectares(),
            deficiencies: report.deficiencies.len(),
            recommendations: report.recommendations.len(),
            total_cost: report.total_cost,
        },
    );

    note_info(&format!(
        "{} deficiencies, {} products, total {}",
        report.deficiencies.len(),
        report.recommendations.len(),
        format_rupees(report.total_cost)
    ));

    if let Some(store) = store {
        let record = ScanRecord::new(&request, report.clone());
        store.insert(&record)?;
        note_success(&format!("Saved to history as {}", record.id));
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn read_soil_file(path: &Path) -> Result<SoilReading> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read soil file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Soil file is not valid JSON: {}", path.display()))?;
    soil_from_json(&value)
}

/// Accepts a scan result (`{ soilData, rawText }`) or a bare reading.
fn soil_from_json(value: &Value) -> Result<SoilReading> {
    let soil = value.get("soilData").unwrap_or(value);
    Ok(SoilReading::from_json(soil)?)
}

fn symbols(nutrients: &[Nutrient]) -> String {
    nutrients
        .iter()
        .map(|n| n.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}
