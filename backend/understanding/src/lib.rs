pub mod extract;
pub mod ocr;

pub use extract::{extract, extract_with_report, normalize, ExtractionReport, FieldMatch};
pub use ocr::{scan_card, OcrEngine, ScanResult, SidecarTextOcr};
