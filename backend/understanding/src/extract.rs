//! Soil card field extractor.
//!
//! Turns noisy OCR output of a Soil Health Card into a [`SoilReading`].
//! Cards print `label : value` pairs with inconsistent casing, separators and
//! chemical notations (`P2O5`, `K2O`), and OCR adds table rules (`|`, `_`).
//! Each nutrient has one case-insensitive pattern: any of its label synonyms,
//! then non-digit separators, then an integer or decimal. The leftmost match
//! in the text wins; no match leaves the field `None`.

use mittiscan_core::{Nutrient, SoilReading};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label synonyms per nutrient, as regex fragments. Single-letter symbols are
/// word-bounded so they never fire inside other words.
const SYNONYMS: [(Nutrient, &[&str]); 5] = [
    (Nutrient::Nitrogen, &["Nitrogen", "Available Nitrogen", r"\bN\b"]),
    (
        Nutrient::Phosphorus,
        &["Phosphorus", "Available Phosphorus", r"\bP\b", "P2O5"],
    ),
    (
        Nutrient::Potassium,
        &["Potassium", "Available Potassium", r"\bK\b", "K2O", "Potash"],
    ),
    (
        Nutrient::OrganicCarbon,
        &["Organic Carbon", r"Org\.?\s*C", r"\bOC\b", "Carbon"],
    ),
    (Nutrient::Ph, &[r"\bpH\b", "Soil Reaction", "Reaction"]),
];

// --- Compiled regexes ---

static NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|_~]").unwrap());

static P2O5_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)P2O5").unwrap());

static K2O_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)K2O").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static FIELD_PATTERNS: Lazy<Vec<(Nutrient, Regex)>> = Lazy::new(|| {
    SYNONYMS
        .iter()
        .map(|(nutrient, labels)| {
            let pattern = format!(r"(?i)({})[^0-9\n]*([0-9]+(?:\.[0-9]+)?)", labels.join("|"));
            (*nutrient, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// One resolved field: which label matched and what it read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub nutrient: Nutrient,
    pub label: String,
    pub value: f64,
}

/// The reading plus what was and was not found, for operator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub reading: SoilReading,
    pub matches: Vec<FieldMatch>,
    pub unresolved: Vec<Nutrient>,
}

/// Strip table noise, rewrite oxide notation to the element and collapse
/// whitespace (newlines included) to single spaces.
pub fn normalize(raw: &str) -> String {
    let text = NOISE_RE.replace_all(raw, " ");
    let text = P2O5_RE.replace_all(&text, "P");
    let text = K2O_RE.replace_all(&text, "K");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Extract a soil reading from raw OCR text. Never fails; fields that cannot
/// be found are `None`.
pub fn extract(raw_text: &str) -> SoilReading {
    extract_with_report(raw_text).reading
}

/// Like [`extract`], also reporting the matched labels and unresolved fields.
pub fn extract_with_report(raw_text: &str) -> ExtractionReport {
    let text = normalize(raw_text);
    let mut reading = SoilReading::default();
    let mut matches = Vec::new();

    for (nutrient, re) in FIELD_PATTERNS.iter() {
        let Some(found) = find_field(re, &text) else {
            continue;
        };
        reading.set(*nutrient, Some(found.1));
        matches.push(FieldMatch {
            nutrient: *nutrient,
            label: found.0,
            value: found.1,
        });
    }

    ExtractionReport {
        unresolved: reading.unresolved(),
        reading,
        matches,
    }
}

fn find_field(re: &Regex, text: &str) -> Option<(String, f64)> {
    let caps = re.captures(text)?;
    let value = caps.get(2)?.as_str().parse::<f64>().ok()?;
    let label = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((label, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [(Nutrient, &[&str]); 5] = [
        (Nutrient::Nitrogen, &["Nitrogen", "Available Nitrogen", "N", "nitrogen"]),
        (
            Nutrient::Phosphorus,
            &["Phosphorus", "Available Phosphorus", "P", "P2O5", "p2o5"],
        ),
        (
            Nutrient::Potassium,
            &["Potassium", "Available Potassium", "K", "K2O", "Potash"],
        ),
        (
            Nutrient::OrganicCarbon,
            &["Organic Carbon", "Org. C", "Org C", "OC", "Carbon"],
        ),
        (Nutrient::Ph, &["pH", "PH", "Soil Reaction", "Reaction"]),
    ];

    const SEPARATORS: [&str; 5] = [":", "-", ".", " ", "    "];

    #[test]
    fn every_label_and_separator_resolves() {
        for (nutrient, labels) in LABELS {
            for label in labels {
                for sep in SEPARATORS {
                    for value in [140.0, 0.75] {
                        let text = format!("{label}{sep}{value}");
                        let reading = extract(&text);
                        assert_eq!(
                            reading.get(nutrient),
                            Some(value),
                            "{nutrient} from {text:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn oxide_notation_maps_to_element() {
        assert_eq!(extract("P2O5: 18.5").p, Some(18.5));
        assert_eq!(extract("K2O : 450").k, Some(450.0));
        assert_eq!(normalize("P2O5 | k2o"), "P K");
    }

    #[test]
    fn empty_input_is_all_unresolved() {
        let report = extract_with_report("");
        assert_eq!(report.reading, SoilReading::default());
        assert_eq!(report.unresolved, Nutrient::ALL.to_vec());
        assert!(report.matches.is_empty());
    }

    #[test]
    fn simple_card_layout() {
        let text = "Soil Health Card\nNitrogen: 140\nPhosphorus: 25\nPotassium: 300\npH: 7.2\nOrganic Carbon: 0.5";
        let reading = extract(text);
        assert_eq!(reading.n, Some(140.0));
        assert_eq!(reading.p, Some(25.0));
        assert_eq!(reading.k, Some(300.0));
        assert_eq!(reading.ph, Some(7.2));
        assert_eq!(reading.oc, Some(0.5));
    }

    #[test]
    fn noisy_card_layout() {
        let text = "Mitti Parikshan Report ...\nAvail N - 240 kg\nP (P2O5) ... 18.5\nK (K2O) : 450\nSoil Reaction (pH) .. 6.5\nOrg. C - 0.75%";
        let reading = extract(text);
        assert_eq!(reading.n, Some(240.0));
        assert_eq!(reading.p, Some(18.5));
        assert_eq!(reading.k, Some(450.0));
        assert_eq!(reading.ph, Some(6.5));
        assert_eq!(reading.oc, Some(0.75));
    }

    #[test]
    fn lowercase_abbreviations() {
        let reading = extract("n : 100\np : 10\nk : 100\nph : 7\noc : 0.4");
        assert_eq!(reading.n, Some(100.0));
        assert_eq!(reading.p, Some(10.0));
        assert_eq!(reading.k, Some(100.0));
        assert_eq!(reading.ph, Some(7.0));
        assert_eq!(reading.oc, Some(0.4));
    }

    #[test]
    fn single_letters_do_not_match_inside_words() {
        let reading = extract("Village Nagpur Block 7 | Potash 200 | Nitrogen 120");
        assert_eq!(reading.n, Some(120.0));
        assert_eq!(reading.k, Some(200.0));
        assert_eq!(reading.p, None);
    }

    #[test]
    fn table_noise_is_ignored() {
        let reading = extract("|__Nitrogen__|~~ 231.5 ~~|\n| pH | 8.1 |");
        assert_eq!(reading.n, Some(231.5));
        assert_eq!(reading.ph, Some(8.1));
    }

    #[test]
    fn only_ascii_digits_are_read() {
        let reading = extract("Nitrogen: 1\u{0663}0");
        assert_eq!(reading.n, Some(1.0));
    }

    #[test]
    fn first_occurrence_wins() {
        let reading = extract("Nitrogen: 150 (previous season Nitrogen: 90)");
        assert_eq!(reading.n, Some(150.0));
    }

    #[test]
    fn report_lists_matched_labels() {
        let report = extract_with_report("Available Potassium: 180\nReaction 5.9");
        assert_eq!(report.unresolved, vec![Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::OrganicCarbon]);
        let k = report.matches.iter().find(|m| m.nutrient == Nutrient::Potassium).unwrap();
        assert_eq!(k.label, "Available Potassium");
        assert_eq!(k.value, 180.0);
    }
}
