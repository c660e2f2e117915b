//! `mittiscan scan`: card → extracted reading.

use std::path::Path;

use anyhow::Result;

use mittiscan_core::Nutrient;
use mittiscan_logging::{AnalysisEvent, EventLogger};
use mittiscan_understanding::{scan_card, SidecarTextOcr};

use crate::terminal_output::{note_info, note_warn};

pub async fn run(path: &Path, request_id: &str) -> Result<()> {
    let result = scan_card(&SidecarTextOcr, path).await?;
    let unresolved = result.soil_data.unresolved();

    if unresolved.is_empty() {
        note_info("All five fields were read from the card");
    } else {
        note_warn(&unresolved_message(&unresolved));
    }

    EventLogger::log_event(
        request_id,
        AnalysisEvent::ScanCompleted {
            source: path.display().to_string(),
            resolved: Nutrient::ALL.len() - unresolved.len(),
            unresolved: unresolved.iter().map(|n| n.symbol().to_string()).collect(),
            raw_text: result.raw_text.clone(),
        },
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn unresolved_message(unresolved: &[Nutrient]) -> String {
    let names: Vec<String> = unresolved.iter().map(|n| n.to_string()).collect();
    format!(
        "Could not read {} from the card; check the values and pass them to `mittiscan analyze`",
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_unresolved_fields() {
        let msg = unresolved_message(&[Nutrient::OrganicCarbon, Nutrient::Ph]);
        assert!(msg.starts_with("Could not read OC, pH from the card"), "{msg}");
    }

    #[tokio::test]
    async fn scans_text_file() {
        let path = std::env::temp_dir().join(format!("mittiscan-card-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "Nitrogen: 140\nP2O5: 12").unwrap();
        run(&path, "req-scan").await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_card_fails() {
        let path = std::env::temp_dir().join(format!("mittiscan-absent-{}.jpg", uuid::Uuid::new_v4()));
        assert!(run(&path, "req-missing").await.is_err());
    }
}
