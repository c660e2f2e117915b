//! Range interpreter: reading → Low/Medium/High bands and pH class.

use mittiscan_config::{NutrientRange, PhThresholds, SoilRangeTable};
use mittiscan_core::{Band, Interpretation, Nutrient, PhBand, SoilReading};

/// `value < low` → Low, `low ≤ value < medium` → Medium, otherwise High.
pub fn classify(value: f64, range: &NutrientRange) -> Band {
    if value < range.low {
        Band::Low
    } else if value < range.medium {
        Band::Medium
    } else {
        Band::High
    }
}

/// Below `acidic` → Acidic, above `alkaline` → Alkaline, otherwise Normal.
pub fn classify_ph(value: f64, thresholds: &PhThresholds) -> PhBand {
    if value < thresholds.acidic {
        PhBand::Acidic
    } else if value > thresholds.alkaline {
        PhBand::Alkaline
    } else {
        PhBand::Normal
    }
}

/// Interpret every resolved field of a reading.
///
/// An unresolved field (or one with no range in the table) has no band; it
/// is never classified as if it were zero.
pub fn interpret(reading: &SoilReading, ranges: &SoilRangeTable) -> Interpretation {
    let band = |nutrient: Nutrient| {
        let value = reading.get(nutrient)?;
        ranges.range(nutrient).map(|range| classify(value, range))
    };

    Interpretation {
        n: band(Nutrient::Nitrogen),
        p: band(Nutrient::Phosphorus),
        k: band(Nutrient::Potassium),
        oc: band(Nutrient::OrganicCarbon),
        ph: reading
            .ph
            .zip(ranges.ph.as_ref())
            .map(|(value, thresholds)| classify_ph(value, thresholds)),
    }
}
