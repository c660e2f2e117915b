//! Optical Character Recognition (OCR) boundary.
//!
//! The recognizer itself (Tesseract, a cloud vision endpoint, ...) is injected
//! by the embedding application through [`OcrEngine`]. This crate only turns
//! the text it produces into a soil reading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use mittiscan_core::SoilReading;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extract::{extract_with_report, ExtractionReport};

/// Anything that can turn a card image into text.
///
/// Timeouts and retries belong to the implementation.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(&self, image: &Path) -> Result<String>;
}

/// Reads text that was recognized ahead of time.
///
/// Given `card.jpg` it reads `card.jpg.txt` or `card.txt`; given a `.txt`
/// file it reads that file directly.
pub struct SidecarTextOcr;

impl SidecarTextOcr {
    fn candidates(image: &Path) -> Vec<PathBuf> {
        if image.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt")) {
            return vec![image.to_path_buf()];
        }
        let mut appended = image.as_os_str().to_owned();
        appended.push(".txt");
        vec![PathBuf::from(appended), image.with_extension("txt")]
    }
}

#[async_trait]
impl OcrEngine for SidecarTextOcr {
    fn name(&self) -> &str {
        "sidecar-text"
    }

    async fn recognize(&self, image: &Path) -> Result<String> {
        for candidate in Self::candidates(image) {
            if candidate.exists() {
                debug!(path = %candidate.display(), "Reading recognized text");
                return tokio::fs::read_to_string(&candidate)
                    .await
                    .with_context(|| format!("Failed to read OCR text: {}", candidate.display()));
            }
        }
        anyhow::bail!("No recognized text found for {}", image.display())
    }
}

/// `{ soilData, rawText }` for one scanned card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub soil_data: SoilReading,
    pub raw_text: String,
    #[serde(skip)]
    pub report: Option<ExtractionReport>,
}

/// Run the engine on a card image and extract the nutrient fields.
pub async fn scan_card(engine: &dyn OcrEngine, image: &Path) -> Result<ScanResult> {
    info!(engine = engine.name(), image = %image.display(), "Running OCR on soil card");

    let raw_text = engine
        .recognize(image)
        .await
        .with_context(|| format!("OCR failed for {}", image.display()))?;

    let report = extract_with_report(&raw_text);
    info!(
        resolved = report.matches.len(),
        unresolved = report.unresolved.len(),
        "Extracted soil card fields"
    );

    Ok(ScanResult {
        soil_data: report.reading,
        raw_text,
        report: Some(report),
    })
}
