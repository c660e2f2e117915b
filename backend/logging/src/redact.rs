//! Log Redaction Layer
//!
//! Soil Health Cards print the farmer's mobile number and Aadhaar number next
//! to the nutrient table. Both are scrubbed from OCR text before it is logged.

use regex::Regex;
use std::sync::LazyLock;

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}\b").unwrap());
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+91[\-\s]?)?\b[6-9]\d{9}\b").unwrap());

/// Redacts personal identifiers in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = AADHAAR_RE.replace_all(input, "[REDACTED_ID]");
    MOBILE_RE.replace_all(&redacted, "[REDACTED_PHONE]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_card_identifiers() {
        let raw = "Farmer: R. Kumar Mobile +91 9876543210 Aadhaar 1234 5678 9012 Nitrogen: 140";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("9876543210"));
        assert!(!clean.contains("1234 5678 9012"));
        assert!(clean.contains("[REDACTED_PHONE]"));
        assert!(clean.contains("[REDACTED_ID]"));
    }

    #[test]
    fn leaves_nutrient_values_alone() {
        let raw = "Nitrogen: 140 Phosphorus: 12.5 Potassium: 180 pH: 6.5 Sample No 20231104";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
