//! Analysis Event Logger
//!
//! Typed events for each scan and analysis, emitted through `tracing` under
//! the `mitti_events` target so the JSON file layer captures them as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    ScanCompleted {
        source: String,
        resolved: usize,
        unresolved: Vec<String>,
        raw_text: String,
    },
    AnalysisCompleted {
        crop: String,
        farm_size_ha: f64,
        deficiencies: usize,
        recommendations: usize,
        total_cost: f64,
    },
    Error {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the entry that [`EventLogger::log_event`] writes, with free text
    /// redacted.
    pub fn entry(request_id: &str, mut event: AnalysisEvent) -> EventLogEntry {
        match &mut event {
            AnalysisEvent::ScanCompleted { raw_text, .. } => {
                *raw_text = redact_sensitive_data(raw_text);
            }
            AnalysisEvent::Error { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            AnalysisEvent::AnalysisCompleted { .. } => {}
        }

        EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(request_id: &str, event: AnalysisEvent) {
        let entry = Self::entry(request_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "mitti_events", event = %json, "Analysis event"),
            Err(e) => info!(target: "mitti_events", event = ?entry, error = %e, "Analysis event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_event_text_is_redacted() {
        let entry = EventLogger::entry(
            "req-1",
            AnalysisEvent::ScanCompleted {
                source: "card.jpg".into(),
                resolved: 5,
                unresolved: vec![],
                raw_text: "Mobile 9876543210 Nitrogen: 140".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "ScanCompleted");
        let text = json["event"]["raw_text"].as_str().unwrap();
        assert!(!text.contains("9876543210"));
        assert!(text.contains("Nitrogen: 140"));
    }

    #[test]
    fn analysis_event_is_untouched() {
        let entry = EventLogger::entry(
            "req-2",
            AnalysisEvent::AnalysisCompleted {
                crop: "wheat".into(),
                farm_size_ha: 1.0,
                deficiencies: 4,
                recommendations: 4,
                total_cost: 7028.0,
            },
        );
        assert_eq!(entry.request_id, "req-2");
        match entry.event {
            AnalysisEvent::AnalysisCompleted { total_cost, .. } => assert_eq!(total_cost, 7028.0),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
