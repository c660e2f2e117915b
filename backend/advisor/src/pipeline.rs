//! The analysis pipeline: request in, report out.

use std::sync::Arc;

use mittiscan_config::ReferenceTables;
use mittiscan_core::{
    total_cost, AnalysisReport, AnalysisRequest, AreaUnit, Deficiency, Interpretation, MittiError,
    Recommendation, Result, SoilReading, DEFAULT_FARM_SIZE,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{calculate_deficiency, interpret, recommend};

/// Runs the interpret → deficiency → recommend stages against one shared set
/// of reference tables.
#[derive(Debug, Clone)]
pub struct Advisor {
    tables: Arc<ReferenceTables>,
}

impl Advisor {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn interpret(&self, reading: &SoilReading) -> Interpretation {
        interpret(reading, &self.tables.soil_ranges)
    }

    pub fn deficiencies(&self, reading: &SoilReading, crop: &str) -> Vec<Deficiency> {
        calculate_deficiency(reading, crop, &self.tables)
    }

    /// `farm_size` is in hectares.
    pub fn recommend(&self, deficiencies: &[Deficiency], farm_size: f64) -> Vec<Recommendation> {
        recommend(deficiencies, farm_size, &self.tables)
    }

    /// Validate a request and run every stage on it.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        request.validate()?;
        let hectares = request.farm_size_hectares();
        debug!(crop = %request.crop, farm_size = request.farm_size, hectares, "Analyzing soil reading");

        let interpretation = self.interpret(&request.soil);
        let deficiencies = self.deficiencies(&request.soil, &request.crop);
        let recommendations = self.recommend(&deficiencies, hectares);
        let total_cost = total_cost(&recommendations);

        info!(
            crop = %request.crop,
            hectares,
            deficiencies = deficiencies.len(),
            recommendations = recommendations.len(),
            total_cost,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            interpretation,
            deficiencies,
            recommendations,
            total_cost,
        })
    }

    /// Analyze a loosely typed `{ soil, crop, farmSize?, unit? }` body.
    ///
    /// Soil values must be numbers or null; anything else is rejected rather
    /// than coerced.
    pub fn analyze_json(&self, body: &Value) -> Result<AnalysisReport> {
        let soil = SoilReading::from_json(body.get("soil").unwrap_or(&Value::Null))?;

        let crop = match body.get("crop") {
            Some(Value::String(crop)) => crop.clone(),
            Some(Value::Null) | None => String::new(),
            Some(_) => return Err(MittiError::invalid("crop", "crop must be a string")),
        };

        let farm_size = match body.get("farmSize") {
            Some(Value::Null) | None => DEFAULT_FARM_SIZE,
            Some(value) => value
                .as_f64()
                .ok_or_else(|| MittiError::invalid("farmSize", "farm size must be a number"))?,
        };

        let unit = match body.get("unit") {
            Some(Value::Null) | None => AreaUnit::default(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
                MittiError::invalid("unit", "unit must be \"hectares\" or \"acres\"")
            })?,
        };

        self.analyze(&AnalysisRequest::new(soil, crop, farm_size).with_unit(unit))
    }
}
