use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MittiError, Result};

/// A soil property tracked on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
    #[serde(rename = "OC")]
    OrganicCarbon,
    #[serde(rename = "pH")]
    Ph,
}

impl Nutrient {
    /// Report order. Deficiencies are always emitted in this order.
    pub const ALL: [Nutrient; 5] = [
        Nutrient::Nitrogen,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
        Nutrient::OrganicCarbon,
        Nutrient::Ph,
    ];

    /// Key used by the soil range and fertilizer tables.
    pub fn table_key(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
            Nutrient::OrganicCarbon => "OC",
            Nutrient::Ph => "pH",
        }
    }

    /// Short symbol used in readings and interpretations.
    pub fn symbol(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
            Nutrient::OrganicCarbon => "OC",
            Nutrient::Ph => "pH",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_key())
    }
}

/// Nutrient values read off a soil card. `None` means the value was not found,
/// which is never the same thing as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilReading {
    /// Available nitrogen, kg/ha.
    #[serde(rename = "N")]
    pub n: Option<f64>,
    /// Available phosphorus, kg/ha.
    #[serde(rename = "P")]
    pub p: Option<f64>,
    /// Available potassium, kg/ha.
    #[serde(rename = "K")]
    pub k: Option<f64>,
    /// Organic carbon, percent.
    #[serde(rename = "OC")]
    pub oc: Option<f64>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
}

impl SoilReading {
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Nitrogen => self.n,
            Nutrient::Phosphorus => self.p,
            Nutrient::Potassium => self.k,
            Nutrient::OrganicCarbon => self.oc,
            Nutrient::Ph => self.ph,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: Option<f64>) {
        let slot = match nutrient {
            Nutrient::Nitrogen => &mut self.n,
            Nutrient::Phosphorus => &mut self.p,
            Nutrient::Potassium => &mut self.k,
            Nutrient::OrganicCarbon => &mut self.oc,
            Nutrient::Ph => &mut self.ph,
        };
        *slot = value;
    }

    /// Fields that are still `None`, in report order.
    pub fn unresolved(&self) -> Vec<Nutrient> {
        Nutrient::ALL
            .into_iter()
            .filter(|n| self.get(*n).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.unresolved().len() == Nutrient::ALL.len()
    }

    /// Build a reading from loosely typed JSON (e.g. an edited scan result).
    ///
    /// Missing keys and `null` become `None`. Anything that is present but not
    /// a number is rejected, since every stage downstream assumes
    /// numeric-or-absent fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| MittiError::invalid("soil", "expected a JSON object"))?;

        let mut reading = SoilReading::default();
        for nutrient in Nutrient::ALL {
            let field = nutrient.symbol();
            let parsed = match obj.get(field) {
                None | Some(Value::Null) => None,
                Some(Value::Number(num)) => Some(num.as_f64().ok_or_else(|| {
                    MittiError::invalid(field, format!("{num} is not representable as f64"))
                })?),
                Some(other) => {
                    return Err(MittiError::invalid(
                        field,
                        format!("expected a number or null, got {other}"),
                    ))
                }
            };
            reading.set(nutrient, parsed);
        }
        reading.validate()?;
        Ok(reading)
    }

    /// Reject NaN, infinite and negative values.
    pub fn validate(&self) -> Result<()> {
        for nutrient in Nutrient::ALL {
            if let Some(v) = self.get(nutrient) {
                if !v.is_finite() {
                    return Err(MittiError::invalid(nutrient.symbol(), "value must be finite"));
                }
                if v < 0.0 {
                    return Err(MittiError::invalid(
                        nutrient.symbol(),
                        format!("value cannot be negative, got {v}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Qualitative band for N, P, K and OC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    Low,
    Medium,
    High,
}

/// Qualitative band for soil reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhBand {
    Acidic,
    Normal,
    Alkaline,
}

/// Per-field interpretation of a reading. A field is absent when its
/// reading was unresolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub n: Option<Band>,
    #[serde(rename = "P", default, skip_serializing_if = "Option::is_none")]
    pub p: Option<Band>,
    #[serde(rename = "K", default, skip_serializing_if = "Option::is_none")]
    pub k: Option<Band>,
    #[serde(rename = "OC", default, skip_serializing_if = "Option::is_none")]
    pub oc: Option<Band>,
    #[serde(rename = "pH", default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<PhBand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeficiencyStatus {
    Low,
    Acidic,
    Alkaline,
}

/// Direction of a pH problem relative to the crop's acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhIssue {
    Low,
    High,
}

/// A nutrient or pH condition below what the crop needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deficiency {
    pub nutrient: Nutrient,
    pub status: DeficiencyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deficiency_percentage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<PhIssue>,
}

impl Deficiency {
    /// A measurable shortfall with its absolute gap and percentage.
    pub fn shortfall(nutrient: Nutrient, gap: f64, percentage: u32) -> Self {
        Self {
            nutrient,
            status: DeficiencyStatus::Low,
            gap: Some(gap),
            deficiency_percentage: Some(percentage),
            issue: None,
        }
    }

    pub fn acidic() -> Self {
        Self {
            nutrient: Nutrient::Ph,
            status: DeficiencyStatus::Acidic,
            gap: None,
            deficiency_percentage: None,
            issue: Some(PhIssue::Low),
        }
    }

    pub fn alkaline() -> Self {
        Self {
            nutrient: Nutrient::Ph,
            status: DeficiencyStatus::Alkaline,
            gap: None,
            deficiency_percentage: None,
            issue: Some(PhIssue::High),
        }
    }
}

/// Where to buy a product online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyLinks {
    pub google: String,
    pub amazon: String,
}

/// One purchase line: a product, how many bags, and what it costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product: String,
    pub bags: u32,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_links: Option<BuyLinks>,
}

/// Sum of the costs of every recommendation line.
pub fn total_cost(recommendations: &[Recommendation]) -> f64 {
    recommendations.iter().map(|r| r.cost).sum()
}

/// Everything computed for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub interpretation: Interpretation,
    pub deficiencies: Vec<Deficiency>,
    pub recommendations: Vec<Recommendation>,
    pub total_cost: f64,
}
