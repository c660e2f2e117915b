//! Reference table validation with path-qualified messages.

use thiserror::Error;

use crate::schema::{MittiConfig, NutrientRange, ReferenceTables, PH_LOW_KEY};

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &MittiConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_reference(&config.reference, &mut report);
    report
}

/// Validate only the reference tables.
pub fn validate_reference(tables: &ReferenceTables, report: &mut ValidationReport) {
    validate_crops(tables, report);
    validate_soil_ranges(tables, report);
    validate_fertilizers(tables, report);
    validate_prices(tables, report);
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn validate_crops(tables: &ReferenceTables, report: &mut ValidationReport) {
    if tables.crops.is_empty() {
        report.warn("reference.crops", "No crops defined; every analysis will report no deficiencies");
    }
    for (key, crop) in &tables.crops {
        let path = format!("reference.crops.{key}");
        if key.trim().is_empty() {
            report.error("reference.crops", "Crop key cannot be empty");
        }
        for (name, target) in [("targetN", crop.target_n), ("targetP", crop.target_p), ("targetK", crop.target_k)] {
            if !positive(target) {
                report.error(format!("{path}.{name}"), format!("{name} must be > 0"));
            }
        }
        if !(crop.ph.min < crop.ph.max) {
            report.error(format!("{path}.pH"), "pH.min must be below pH.max");
        }
    }
}

fn validate_range(path: &str, range: &NutrientRange, report: &mut ValidationReport) {
    if !(range.low.is_finite() && range.medium.is_finite()) {
        report.error(path, "low and medium must be finite numbers");
    } else if range.low <= 0.0 {
        report.error(path, format!("low must be > 0, got {}", range.low));
    } else if range.low >= range.medium {
        report.error(path, format!("low ({}) must be below medium ({})", range.low, range.medium));
    }
}

fn validate_soil_ranges(tables: &ReferenceTables, report: &mut ValidationReport) {
    let ranges = &tables.soil_ranges;
    let banded = [
        ("Nitrogen", &ranges.nitrogen),
        ("Phosphorus", &ranges.phosphorus),
        ("Potassium", &ranges.potassium),
        ("OC", &ranges.oc),
    ];
    for (key, range) in banded {
        let path = format!("reference.soilRanges.{key}");
        match range {
            Some(range) => validate_range(&path, range, report),
            None => report.warn(path, "No range defined; this nutrient will not be interpreted"),
        }
    }
    match &ranges.ph {
        Some(ph) if ph.acidic >= ph.alkaline => report.error(
            "reference.soilRanges.pH",
            "acidic threshold must be below alkaline threshold",
        ),
        Some(_) => {}
        None => report.warn("reference.soilRanges.pH", "No pH thresholds defined"),
    }
}

fn validate_fertilizers(tables: &ReferenceTables, report: &mut ValidationReport) {
    for (key, fert) in &tables.fertilizers {
        let path = format!("reference.fertilizers.{key}");
        if fert.product.trim().is_empty() {
            report.error(format!("{path}.product"), "Product name cannot be empty");
        }
        if !(fert.nutrient_content > 0.0 && fert.nutrient_content <= 1.0) {
            report.error(
                format!("{path}.nutrientContent"),
                format!("nutrientContent must be within (0, 1], got {}", fert.nutrient_content),
            );
        }
        if !positive(fert.bag_weight) {
            report.error(format!("{path}.bagWeight"), "bagWeight must be > 0");
        }
        if tables.price(&fert.product).is_none() {
            report.warn(
                format!("{path}.product"),
                format!("'{}' has no price; it will never be recommended", fert.product),
            );
        }
    }
    if !tables.fertilizers.contains_key(PH_LOW_KEY) {
        report.warn(
            format!("reference.fertilizers.{PH_LOW_KEY}"),
            "No acidity correction product; acidic soil gets no recommendation",
        );
    }
}

fn validate_prices(tables: &ReferenceTables, report: &mut ValidationReport) {
    for (product, price) in &tables.prices {
        if !positive(*price) {
            report.error(format!("reference.prices.{product}"), "Price per bag must be > 0");
        }
    }
}
