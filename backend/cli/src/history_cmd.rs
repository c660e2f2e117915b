//! `mittiscan history` and `mittiscan metrics`.

use anyhow::Result;

use mittiscan_store::{ScanRecord, ScanStore};

use crate::terminal_output::{format_rupees, note_info, render_table, Column};

pub fn history(store: &ScanStore, limit: usize, trends: bool, json: bool) -> Result<()> {
    let records = if trends {
        store.trends()?
    } else {
        store.recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        note_info("No scans recorded yet");
    } else {
        print!("{}", history_table(&records));
    }
    Ok(())
}

pub fn metrics(store: &ScanStore) -> Result<()> {
    let metrics = store.metrics()?;
    note_info(&format!(
        "{} scans, {} deficiencies found, {} recommended in total",
        metrics.total_scans,
        metrics.total_deficiencies,
        format_rupees(metrics.total_cost)
    ));
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

fn history_table(records: &[ScanRecord]) -> String {
    let columns = [
        Column::left("Scanned"),
        Column::left("Crop"),
        Column::right("Farm size"),
        Column::right("N"),
        Column::right("P"),
        Column::right("K"),
        Column::right("OC"),
        Column::right("pH"),
        Column::right("Deficiencies"),
        Column::right("Cost"),
    ];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.scanned_at.format("%Y-%m-%d %H:%M").to_string(),
                r.crop.clone(),
                format!("{}", r.farm_size),
                value(r.soil.n),
                value(r.soil.p),
                value(r.soil.k),
                value(r.soil.oc),
                value(r.soil.ph),
                r.deficiencies.len().to_string(),
                format_rupees(r.total_cost),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

fn value(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
