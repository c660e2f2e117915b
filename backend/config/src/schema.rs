//! MittiScan configuration schema.
//!
//! The agronomic reference tables (crop standards, soil ranges, fertilizer
//! mapping, prices) plus the few runtime settings the CLI needs, typed for
//! serde YAML/JSON with the same camelCase keys the soil card service uses.

use std::collections::BTreeMap;

use mittiscan_core::{BuyLinks, Nutrient};
use serde::{Deserialize, Serialize};

/// Fertilizer mapping key for acidity correction (lime).
pub const PH_LOW_KEY: &str = "pH_low";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MittiConfig {
    /// Agronomic reference tables
    #[serde(default)]
    pub reference: ReferenceTables,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Scan history storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

/// Immutable reference data every pipeline stage reads from.
///
/// Built once at startup and shared by reference; nothing in the pipeline
/// writes to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTables {
    /// Crop key (`wheat`, `rice`, ...) → targets
    #[serde(default)]
    pub crops: BTreeMap<String, CropStandard>,

    #[serde(default)]
    pub soil_ranges: SoilRangeTable,

    /// Nutrient key (`Nitrogen`, ..., `pH_low`) → product
    #[serde(default)]
    pub fertilizers: BTreeMap<String, FertilizerProduct>,

    /// Product name → price per bag
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
}

impl ReferenceTables {
    /// Look up a crop standard. Keys match exactly first, then ignoring
    /// ASCII case and surrounding whitespace.
    pub fn crop(&self, key: &str) -> Option<&CropStandard> {
        if let Some(standard) = self.crops.get(key) {
            return Some(standard);
        }
        let key = key.trim();
        self.crops
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, standard)| standard)
    }

    pub fn fertilizer(&self, key: &str) -> Option<&FertilizerProduct> {
        self.fertilizers.get(key)
    }

    pub fn price(&self, product: &str) -> Option<f64> {
        self.prices.get(product).copied()
    }
}

/// Target nutrient levels and acceptable pH for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropStandard {
    pub target_n: f64,
    pub target_p: f64,
    pub target_k: f64,
    #[serde(rename = "pH")]
    pub ph: PhRange,
}

impl CropStandard {
    /// Per-crop target for N, P or K. OC and pH have no per-crop target.
    pub fn target(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Nitrogen => Some(self.target_n),
            Nutrient::Phosphorus => Some(self.target_p),
            Nutrient::Potassium => Some(self.target_k),
            Nutrient::OrganicCarbon | Nutrient::Ph => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
}

/// Low/medium thresholds for every banded nutrient, and pH cut-offs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilRangeTable {
    #[serde(rename = "Nitrogen", default, skip_serializing_if = "Option::is_none")]
    pub nitrogen: Option<NutrientRange>,
    #[serde(rename = "Phosphorus", default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<NutrientRange>,
    #[serde(rename = "Potassium", default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<NutrientRange>,
    #[serde(rename = "OC", default, skip_serializing_if = "Option::is_none")]
    pub oc: Option<NutrientRange>,
    #[serde(rename = "pH", default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<PhThresholds>,
}

impl SoilRangeTable {
    pub fn range(&self, nutrient: Nutrient) -> Option<&NutrientRange> {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen.as_ref(),
            Nutrient::Phosphorus => self.phosphorus.as_ref(),
            Nutrient::Potassium => self.potassium.as_ref(),
            Nutrient::OrganicCarbon => self.oc.as_ref(),
            Nutrient::Ph => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRange {
    pub low: f64,
    pub medium: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhThresholds {
    pub acidic: f64,
    pub alkaline: f64,
}

/// A purchasable product that corrects one deficiency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerProduct {
    pub product: String,
    /// Fraction of the bag that is the corrected nutrient, 0–1
    pub nutrient_content: f64,
    /// Bag weight in kg
    pub bag_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_links: Option<BuyLinks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_yaml() {
        let yaml = r#"
reference:
  crops:
    wheat:
      targetN: 300
      targetP: 40
      targetK: 300
      pH: { min: 6.0, max: 7.5 }
  soilRanges:
    Nitrogen: { low: 280, medium: 560, unit: "kg/ha" }
    pH: { acidic: 6.0, alkaline: 7.5 }
  fertilizers:
    pH_low: { product: "Agricultural Lime", nutrientContent: 1, bagWeight: 50 }
  prices:
    "Agricultural Lime": 300
"#;
        let cfg: MittiConfig = serde_yaml::from_str(yaml).unwrap();
        let wheat = cfg.reference.crop("wheat").unwrap();
        assert_eq!(wheat.target(Nutrient::Phosphorus), Some(40.0));
        assert_eq!(wheat.target(Nutrient::Ph), None);
        assert_eq!(cfg.reference.soil_ranges.range(Nutrient::Nitrogen).unwrap().low, 280.0);
        assert!(cfg.reference.soil_ranges.oc.is_none());
        assert_eq!(cfg.reference.fertilizer(PH_LOW_KEY).unwrap().bag_weight, 50.0);
        assert_eq!(cfg.reference.price("Agricultural Lime"), Some(300.0));
    }

    #[test]
    fn crop_lookup_ignores_case_and_padding() {
        let mut tables = ReferenceTables::default();
        tables.crops.insert(
            "rice".into(),
            CropStandard {
                target_n: 250.0,
                target_p: 30.0,
                target_k: 250.0,
                ph: PhRange { min: 5.5, max: 7.0 },
            },
        );
        assert!(tables.crop(" Rice ").is_some());
        assert!(tables.crop("barley").is_none());
    }
}
