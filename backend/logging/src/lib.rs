//! Structured logging for MittiScan.
//!
//! Console plus rolling NDJSON file output, typed scan/analysis events, and
//! redaction of farmer identifiers printed on soil cards.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
