//! Fertilizer recommender: deficiencies → products, bags and cost.

use mittiscan_config::{FertilizerProduct, ReferenceTables, PH_LOW_KEY};
use mittiscan_core::{Deficiency, DeficiencyStatus, Nutrient, Recommendation};
use tracing::debug;

/// Fertilizer table key that corrects a deficiency.
///
/// Acidic soil maps to `pH_low`. Alkaline soil has no correcting product.
pub fn mapping_key(deficiency: &Deficiency) -> Option<&'static str> {
    match (deficiency.nutrient, deficiency.status) {
        (Nutrient::Ph, DeficiencyStatus::Acidic) => Some(PH_LOW_KEY),
        (Nutrient::Ph, _) => None,
        (nutrient, _) => Some(nutrient.table_key()),
    }
}

/// `ceil(gap × farm_size / (content × bag_weight))`, or one bag when there is
/// no gap or the arithmetic does not give a positive finite count.
pub fn bag_count(gap: Option<f64>, farm_size: f64, product: &FertilizerProduct) -> u32 {
    let Some(gap) = gap else {
        return 1;
    };
    let bags = (gap * farm_size / (product.nutrient_content * product.bag_weight)).ceil();
    if bags.is_finite() && bags > 0.0 {
        bags as u32
    } else {
        1
    }
}

/// One purchase line per correctable deficiency, in deficiency order.
///
/// Deficiencies with no mapped product or no usable price are skipped.
pub fn recommend(
    deficiencies: &[Deficiency],
    farm_size: f64,
    tables: &ReferenceTables,
) -> Vec<Recommendation> {
    deficiencies
        .iter()
        .filter_map(|deficiency| recommend_one(deficiency, farm_size, tables))
        .collect()
}

fn recommend_one(
    deficiency: &Deficiency,
    farm_size: f64,
    tables: &ReferenceTables,
) -> Option<Recommendation> {
    let Some(key) = mapping_key(deficiency) else {
        debug!(nutrient = %deficiency.nutrient, status = ?deficiency.status, "No corrective product");
        return None;
    };
    let Some(product) = tables.fertilizer(key) else {
        debug!(key, "No fertilizer mapped");
        return None;
    };
    let price = match tables.price(&product.product) {
        Some(price) if price.is_finite() && price > 0.0 => price,
        other => {
            debug!(product = %product.product, price = ?other, "No usable price, skipping");
            return None;
        }
    };

    let bags = bag_count(deficiency.gap, farm_size, product);
    Some(Recommendation {
        product: product.product.clone(),
        bags,
        cost: f64::from(bags) * price,
        buy_links: product.buy_links.clone(),
    })
}
