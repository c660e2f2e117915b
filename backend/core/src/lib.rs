pub mod error;
pub mod request;
pub mod types;

pub use error::{MittiError, Result};
pub use request::{AnalysisRequest, AreaUnit, ACRES_TO_HECTARES, DEFAULT_FARM_SIZE, PH_MAX, PH_MIN};
pub use types::{
    total_cost, AnalysisReport, Band, BuyLinks, Deficiency, DeficiencyStatus, Interpretation,
    Nutrient, PhBand, PhIssue, Recommendation, SoilReading,
};
