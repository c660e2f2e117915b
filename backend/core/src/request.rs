//! Caller-facing analysis request and farm area units.

use serde::{Deserialize, Serialize};

use crate::error::{MittiError, Result};
use crate::types::SoilReading;

/// Hectares per acre.
pub const ACRES_TO_HECTARES: f64 = 0.4047;

/// Accepted soil pH at the request boundary.
pub const PH_MIN: f64 = 3.0;
pub const PH_MAX: f64 = 9.0;

/// Farm size used when a caller does not provide one.
pub const DEFAULT_FARM_SIZE: f64 = 1.0;

/// Unit of the farm size supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    Hectares,
    Acres,
}

impl AreaUnit {
    pub fn to_hectares(&self, size: f64) -> f64 {
        match self {
            AreaUnit::Hectares => size,
            AreaUnit::Acres => size * ACRES_TO_HECTARES,
        }
    }
}

/// `{ soil, crop, farmSize, unit? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub soil: SoilReading,
    pub crop: String,
    #[serde(default = "default_farm_size")]
    pub farm_size: f64,
    #[serde(default)]
    pub unit: AreaUnit,
}

fn default_farm_size() -> f64 {
    DEFAULT_FARM_SIZE
}

impl AnalysisRequest {
    pub fn new(soil: SoilReading, crop: impl Into<String>, farm_size: f64) -> Self {
        Self {
            soil,
            crop: crop.into(),
            farm_size,
            unit: AreaUnit::Hectares,
        }
    }

    pub fn with_unit(mut self, unit: AreaUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Farm size in the unit the crop targets are denominated in.
    pub fn farm_size_hectares(&self) -> f64 {
        self.unit.to_hectares(self.farm_size)
    }

    /// Boundary checks run before any stage sees the request.
    pub fn validate(&self) -> Result<()> {
        if self.crop.trim().is_empty() {
            return Err(MittiError::invalid("crop", "crop is required"));
        }
        if !self.farm_size.is_finite() || self.farm_size <= 0.0 {
            return Err(MittiError::invalid(
                "farmSize",
                format!("farm size must be a positive number, got {}", self.farm_size),
            ));
        }
        self.soil.validate()?;
        if let Some(ph) = self.soil.ph {
            if !(PH_MIN..=PH_MAX).contains(&ph) {
                return Err(MittiError::PhOutOfRange {
                    value: ph,
                    min: PH_MIN,
                    max: PH_MAX,
                });
            }
        }
        Ok(())
    }
}
