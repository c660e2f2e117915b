use chrono::{DateTime, Utc};
use mittiscan_core::{
    AnalysisReport, AnalysisRequest, Deficiency, Interpretation, Recommendation, SoilReading,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One analyzed card as kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: Uuid,
    pub soil: SoilReading,
    pub crop: String,
    pub farm_size: f64,
    pub interpretation: Interpretation,
    pub deficiencies: Vec<Deficiency>,
    pub recommendations: Vec<Recommendation>,
    pub total_cost: f64,
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Record a finished analysis, stamped now.
    pub fn new(request: &AnalysisRequest, report: AnalysisReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            soil: request.soil,
            crop: request.crop.clone(),
            farm_size: request.farm_size,
            interpretation: report.interpretation,
            deficiencies: report.deficiencies,
            recommendations: report.recommendations,
            total_cost: report.total_cost,
            scanned_at: Utc::now(),
        }
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            interpretation: self.interpretation.clone(),
            deficiencies: self.deficiencies.clone(),
            recommendations: self.recommendations.clone(),
            total_cost: self.total_cost,
        }
    }
}

/// Cumulative figures across every stored scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub total_scans: u64,
    pub total_deficiencies: u64,
    pub total_cost: f64,
}
