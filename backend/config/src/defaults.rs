//! Config defaults: the built-in Soil Health Card reference tables and
//! runtime settings, applied wherever the user's config leaves a gap.

use std::collections::BTreeMap;

use mittiscan_core::BuyLinks;

use crate::schema::{
    CropStandard, FertilizerProduct, LoggingConfig, MittiConfig, NutrientRange, PhRange,
    PhThresholds, ReferenceTables, SoilRangeTable, StorageConfig, PH_LOW_KEY,
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default directory for rolling log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default scan history database.
pub const DEFAULT_DB_PATH: &str = "mittiscan.db";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: MittiConfig) -> MittiConfig {
    let config = apply_reference_defaults(config);
    let config = apply_logging_defaults(config);
    apply_storage_defaults(config)
}

/// The complete built-in reference tables.
pub fn builtin_reference_tables() -> ReferenceTables {
    ReferenceTables {
        crops: builtin_crops(),
        soil_ranges: builtin_soil_ranges(),
        fertilizers: builtin_fertilizers(),
        prices: builtin_prices(),
    }
}

/// Fill empty tables and missing soil ranges. Anything the user set is kept.
fn apply_reference_defaults(mut config: MittiConfig) -> MittiConfig {
    let reference = &mut config.reference;
    if reference.crops.is_empty() {
        reference.crops = builtin_crops();
    }
    if reference.fertilizers.is_empty() {
        reference.fertilizers = builtin_fertilizers();
    }
    if reference.prices.is_empty() {
        reference.prices = builtin_prices();
    }

    let builtin = builtin_soil_ranges();
    let ranges = &mut reference.soil_ranges;
    ranges.nitrogen = ranges.nitrogen.take().or(builtin.nitrogen);
    ranges.phosphorus = ranges.phosphorus.take().or(builtin.phosphorus);
    ranges.potassium = ranges.potassium.take().or(builtin.potassium);
    ranges.oc = ranges.oc.take().or(builtin.oc);
    ranges.ph = ranges.ph.take().or(builtin.ph);
    config
}

fn apply_logging_defaults(mut config: MittiConfig) -> MittiConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.dir.is_none() {
        logging.dir = Some(DEFAULT_LOG_DIR.to_string());
    }
    config
}

fn apply_storage_defaults(mut config: MittiConfig) -> MittiConfig {
    let storage = config.storage.get_or_insert_with(StorageConfig::default);
    if storage.db_path.is_none() {
        storage.db_path = Some(DEFAULT_DB_PATH.to_string());
    }
    config
}

fn crop(target_n: f64, target_p: f64, target_k: f64, min: f64, max: f64) -> CropStandard {
    CropStandard {
        target_n,
        target_p,
        target_k,
        ph: PhRange { min, max },
    }
}

fn builtin_crops() -> BTreeMap<String, CropStandard> {
    BTreeMap::from([
        ("wheat".to_string(), crop(300.0, 40.0, 300.0, 6.0, 7.5)),
        ("rice".to_string(), crop(250.0, 30.0, 250.0, 5.5, 7.0)),
        ("cotton".to_string(), crop(275.0, 35.0, 275.0, 6.0, 7.5)),
    ])
}

fn range(low: f64, medium: f64, unit: &str) -> Option<NutrientRange> {
    Some(NutrientRange {
        low,
        medium,
        unit: unit.to_string(),
    })
}

fn builtin_soil_ranges() -> SoilRangeTable {
    SoilRangeTable {
        nitrogen: range(280.0, 560.0, "kg/ha"),
        phosphorus: range(10.0, 25.0, "kg/ha"),
        potassium: range(110.0, 280.0, "kg/ha"),
        oc: range(0.5, 0.75, "%"),
        ph: Some(PhThresholds {
            acidic: 6.0,
            alkaline: 7.5,
        }),
    }
}

/// Search links for a product, as the card service shows them.
fn buy_links(product: &str, google_suffix: &str) -> BuyLinks {
    let query = product.replace(' ', "+");
    BuyLinks {
        google: format!("https://www.google.com/search?q={query}{google_suffix}"),
        amazon: format!("https://www.amazon.in/s?k={query}"),
    }
}

fn product(name: &str, nutrient_content: f64, bag_weight: f64, google_suffix: &str) -> FertilizerProduct {
    FertilizerProduct {
        product: name.to_string(),
        nutrient_content,
        bag_weight,
        buy_links: Some(buy_links(name, google_suffix)),
    }
}

fn builtin_fertilizers() -> BTreeMap<String, FertilizerProduct> {
    BTreeMap::from([
        ("Nitrogen".to_string(), product("Neem Coated Urea", 0.46, 45.0, "+fertilizer+near+me")),
        ("Phosphorus".to_string(), product("Single Super Phosphate", 0.16, 50.0, "+fertilizer+near+me")),
        ("Potassium".to_string(), product("Muriate of Potash", 0.60, 50.0, "+fertilizer+near+me")),
        ("OC".to_string(), product("Vermicompost", 0.20, 50.0, "+near+me")),
        (PH_LOW_KEY.to_string(), product("Agricultural Lime", 1.0, 50.0, "+near+me")),
    ])
}

fn builtin_prices() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("Neem Coated Urea".to_string(), 266.0),
        ("Single Super Phosphate".to_string(), 350.0),
        ("Muriate of Potash".to_string(), 800.0),
        ("Vermicompost".to_string(), 400.0),
        ("Agricultural Lime".to_string(), 300.0),
    ])
}
