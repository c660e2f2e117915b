//! Deficiency calculator: reading + crop → what the soil is short of.

use mittiscan_config::ReferenceTables;
use mittiscan_core::{Deficiency, Nutrient, SoilReading};
use tracing::warn;

/// Deficiencies of `reading` against the standard for `crop_key`, in the
/// fixed order N, P, K, OC, pH.
///
/// N, P and K are compared with the crop's targets; OC with the `low`
/// threshold of its soil range. Only values strictly below the reference
/// count. An unknown crop yields an empty list.
pub fn calculate_deficiency(
    reading: &SoilReading,
    crop_key: &str,
    tables: &ReferenceTables,
) -> Vec<Deficiency> {
    let Some(standard) = tables.crop(crop_key) else {
        warn!(crop = crop_key, "Unknown crop, no deficiencies computed");
        return Vec::new();
    };

    let mut deficiencies = Vec::new();

    for nutrient in [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium] {
        if let (Some(value), Some(target)) = (reading.get(nutrient), standard.target(nutrient)) {
            deficiencies.extend(shortfall(nutrient, value, target));
        }
    }

    if let (Some(value), Some(range)) = (reading.oc, tables.soil_ranges.oc.as_ref()) {
        deficiencies.extend(shortfall(Nutrient::OrganicCarbon, value, range.low));
    }

    if let Some(ph) = reading.ph {
        if ph < standard.ph.min {
            deficiencies.push(Deficiency::acidic());
        } else if ph > standard.ph.max {
            deficiencies.push(Deficiency::alkaline());
        }
    }

    deficiencies
}

fn shortfall(nutrient: Nutrient, value: f64, reference: f64) -> Option<Deficiency> {
    if reference <= 0.0 {
        warn!(nutrient = nutrient.symbol(), reference, "Non-positive reference, shortfall skipped");
        return None;
    }
    if value >= reference {
        return None;
    }
    let gap = reference - value;
    let percentage = (gap / reference * 100.0).round().clamp(0.0, 100.0) as u32;
    Some(Deficiency::shortfall(nutrient, gap, percentage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mittiscan_config::builtin_reference_tables;
    use mittiscan_core::{DeficiencyStatus, PhIssue};

    fn card() -> SoilReading {
        SoilReading {
            n: Some(140.0),
            p: Some(12.0),
            k: Some(180.0),
            oc: None,
            ph: Some(5.5),
        }
    }

    #[test]
    fn wheat_card() {
        let deficiencies = calculate_deficiency(&card(), "wheat", &builtin_reference_tables());
        assert_eq!(
            deficiencies,
            vec![
                Deficiency::shortfall(Nutrient::Nitrogen, 160.0, 53),
                Deficiency::shortfall(Nutrient::Phosphorus, 28.0, 70),
                Deficiency::shortfall(Nutrient::Potassium, 120.0, 40),
                Deficiency::acidic(),
            ]
        );
    }

    #[test]
    fn wire_shape_of_entries() {
        let deficiencies = calculate_deficiency(&card(), "wheat", &builtin_reference_tables());
        let json = serde_json::to_value(&deficiencies).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({
                "nutrient": "Nitrogen",
                "status": "Low",
                "gap": 160.0,
                "deficiency_percentage": 53
            })
        );
        assert_eq!(
            json[3],
            serde_json::json!({ "nutrient": "pH", "status": "Acidic", "issue": "Low" })
        );
    }

    #[test]
    fn unknown_crop_is_empty() {
        assert!(calculate_deficiency(&card(), "barley", &builtin_reference_tables()).is_empty());
    }

    #[test]
    fn crop_key_ignores_case_and_padding() {
        let tables = builtin_reference_tables();
        assert_eq!(
            calculate_deficiency(&card(), " Wheat ", &tables),
            calculate_deficiency(&card(), "wheat", &tables)
        );
    }

    #[test]
    fn values_at_target_are_not_deficient() {
        let reading = SoilReading {
            n: Some(300.0),
            p: Some(40.0),
            k: Some(300.0),
            oc: Some(0.5),
            ph: Some(6.0),
        };
        assert!(calculate_deficiency(&reading, "wheat", &builtin_reference_tables()).is_empty());
    }

    #[test]
    fn organic_carbon_against_low_threshold() {
        let reading = SoilReading {
            oc: Some(0.4),
            ..Default::default()
        };
        let deficiencies = calculate_deficiency(&reading, "rice", &builtin_reference_tables());
        assert_eq!(deficiencies.len(), 1);
        let oc = &deficiencies[0];
        assert_eq!(oc.nutrient, Nutrient::OrganicCarbon);
        assert_eq!(oc.status, DeficiencyStatus::Low);
        assert!((oc.gap.unwrap() - 0.1).abs() < 1e-9);
        assert_eq!(oc.deficiency_percentage, Some(20));
    }

    #[test]
    fn alkaline_soil_flags_high_ph() {
        let reading = SoilReading {
            ph: Some(8.2),
            ..Default::default()
        };
        let deficiencies = calculate_deficiency(&reading, "rice", &builtin_reference_tables());
        assert_eq!(deficiencies, vec![Deficiency::alkaline()]);
        assert_eq!(deficiencies[0].issue, Some(PhIssue::High));
    }

    #[test]
    fn ph_range_depends_on_crop() {
        let reading = SoilReading {
            ph: Some(5.7),
            ..Default::default()
        };
        let tables = builtin_reference_tables();
        assert_eq!(calculate_deficiency(&reading, "wheat", &tables), vec![Deficiency::acidic()]);
        assert!(calculate_deficiency(&reading, "rice", &tables).is_empty());
    }

    #[test]
    fn unresolved_fields_produce_nothing() {
        let reading = SoilReading {
            k: Some(100.0),
            ..Default::default()
        };
        let deficiencies = calculate_deficiency(&reading, "cotton", &builtin_reference_tables());
        assert_eq!(deficiencies, vec![Deficiency::shortfall(Nutrient::Potassium, 175.0, 64)]);
    }

    #[test]
    fn non_positive_reference_is_skipped() {
        let mut tables = builtin_reference_tables();
        tables.soil_ranges.oc.as_mut().unwrap().low = 0.0;
        let reading = SoilReading {
            oc: Some(-0.2),
            ..Default::default()
        };
        assert!(calculate_deficiency(&reading, "wheat", &tables).is_empty());
    }

    #[test]
    fn percentage_never_exceeds_full_shortfall() {
        let reading = SoilReading {
            n: Some(-300.0),
            ..Default::default()
        };
        let deficiencies = calculate_deficiency(&reading, "wheat", &builtin_reference_tables());
        assert_eq!(deficiencies[0].deficiency_percentage, Some(100));
    }

    #[test]
    fn zero_reading_is_a_full_shortfall() {
        let reading = SoilReading {
            n: Some(0.0),
            ..Default::default()
        };
        let deficiencies = calculate_deficiency(&reading, "wheat", &builtin_reference_tables());
        assert_eq!(deficiencies, vec![Deficiency::shortfall(Nutrient::Nitrogen, 300.0, 100)]);
    }
}
