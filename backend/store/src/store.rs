use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::record::{PlatformMetrics, ScanRecord};

const SELECT_COLUMNS: &str = "SELECT id, soil, crop, farm_size, interpretation, deficiencies,
        recommendations, total_cost, scanned_at FROM scans";

/// SQLite-backed history of analyzed cards.
///
/// Structured fields are stored as JSON text; counts and cost get their own
/// columns so metrics are computed in SQL.
pub struct ScanStore {
    conn: Connection,
}

impl ScanStore {
    /// Open or create the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database: {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        info!(path = %path.display(), "Scan store opened");
        Ok(store)
    }

    /// Create an in-memory store (for testing and `--no-save` runs).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory SQLite")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS scans (
                    id TEXT PRIMARY KEY,
                    soil TEXT NOT NULL,
                    crop TEXT NOT NULL,
                    farm_size REAL NOT NULL,
                    interpretation TEXT NOT NULL,
                    deficiencies TEXT NOT NULL,
                    deficiency_count INTEGER NOT NULL,
                    recommendations TEXT NOT NULL,
                    total_cost REAL NOT NULL,
                    scanned_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_scans_scanned_at ON scans(scanned_at);",
            )
            .context("Failed to create scan schema")?;
        Ok(())
    }

    pub fn insert(&self, record: &ScanRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO scans (id, soil, crop, farm_size, interpretation, deficiencies,
                    deficiency_count, recommendations, total_cost, scanned_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id.to_string(),
                    serde_json::to_string(&record.soil)?,
                    record.crop,
                    record.farm_size,
                    serde_json::to_string(&record.interpretation)?,
                    serde_json::to_string(&record.deficiencies)?,
                    record.deficiencies.len() as i64,
                    serde_json::to_string(&record.recommendations)?,
                    record.total_cost,
                    timestamp(&record.scanned_at),
                ],
            )
            .with_context(|| format!("Failed to insert scan {}", record.id))?;
        debug!(id = %record.id, crop = %record.crop, "Scan recorded");
        Ok(())
    }

    /// Every scan, oldest first.
    pub fn trends(&self) -> Result<Vec<ScanRecord>> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY scanned_at ASC, rowid ASC"), None)
    }

    /// The most recent scans, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ScanRecord>> {
        self.query(
            &format!("{SELECT_COLUMNS} ORDER BY scanned_at DESC, rowid DESC LIMIT ?1"),
            Some(limit),
        )
    }

    pub fn count(&self) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Scan count, total deficiencies and total recommended spend.
    pub fn metrics(&self) -> Result<PlatformMetrics> {
        let (scans, deficiencies, cost): (i64, i64, f64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(deficiency_count), 0), TOTAL(total_cost) FROM scans",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .context("Failed to compute platform metrics")?;

        Ok(PlatformMetrics {
            total_scans: scans.max(0) as u64,
            total_deficiencies: deficiencies.max(0) as u64,
            total_cost: cost,
        })
    }

    fn query(&self, sql: &str, limit: Option<usize>) -> Result<Vec<ScanRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match limit {
            Some(limit) => stmt.query_map(params![limit], raw_row)?,
            None => stmt.query_map([], raw_row)?,
        };

        let mut records = Vec::new();
        for row in rows {
            records.push(decode(row?)?);
        }
        Ok(records)
    }
}

/// Fixed-width RFC 3339 so text ordering is time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

struct RawRow {
    id: String,
    soil: String,
    crop: String,
    farm_size: f64,
    interpretation: String,
    deficiencies: String,
    recommendations: String,
    total_cost: f64,
    scanned_at: String,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        soil: row.get(1)?,
        crop: row.get(2)?,
        farm_size: row.get(3)?,
        interpretation: row.get(4)?,
        deficiencies: row.get(5)?,
        recommendations: row.get(6)?,
        total_cost: row.get(7)?,
        scanned_at: row.get(8)?,
    })
}

fn decode(raw: RawRow) -> Result<ScanRecord> {
    let id = Uuid::parse_str(&raw.id).with_context(|| format!("Bad scan id {}", raw.id))?;
    Ok(ScanRecord {
        id,
        soil: serde_json::from_str(&raw.soil).with_context(|| format!("Bad soil for {id}"))?,
        crop: raw.crop,
        farm_size: raw.farm_size,
        interpretation: serde_json::from_str(&raw.interpretation)
            .with_context(|| format!("Bad interpretation for {id}"))?,
        deficiencies: serde_json::from_str(&raw.deficiencies)
            .with_context(|| format!("Bad deficiencies for {id}"))?,
        recommendations: serde_json::from_str(&raw.recommendations)
            .with_context(|| format!("Bad recommendations for {id}"))?,
        total_cost: raw.total_cost,
        scanned_at: DateTime::parse_from_rfc3339(&raw.scanned_at)
            .with_context(|| format!("Bad timestamp for {id}"))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use mittiscan_core::{
        AnalysisReport, AnalysisRequest, Band, Deficiency, Interpretation, Nutrient,
        Recommendation, SoilReading,
    };

    fn report(deficiencies: usize, total_cost: f64) -> AnalysisReport {
        AnalysisReport {
            interpretation: Interpretation {
                n: Some(Band::Low),
                ..Default::default()
            },
            deficiencies: (0..deficiencies)
                .map(|_| Deficiency::shortfall(Nutrient::Nitrogen, 160.0, 53))
                .collect(),
            recommendations: vec![Recommendation {
                product: "Neem Coated Urea".into(),
                bags: 8,
                cost: total_cost,
                buy_links: None,
            }],
            total_cost,
        }
    }

    fn record_at(seconds: i64, deficiencies: usize, total_cost: f64) -> ScanRecord {
        let request = AnalysisRequest::new(
            SoilReading {
                n: Some(140.0),
                ..Default::default()
            },
            "wheat",
            1.0,
        );
        let mut record = ScanRecord::new(&request, report(deficiencies, total_cost));
        record.scanned_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(seconds);
        record
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = ScanStore::in_memory().unwrap();
        let record = record_at(0, 1, 2128.0);
        store.insert(&record).unwrap();

        let stored = store.trends().unwrap();
        assert_eq!(stored, vec![record.clone()]);
        assert_eq!(stored[0].report(), report(1, 2128.0));
        assert_eq!(stored[0].soil.p, None);
    }

    #[test]
    fn test_count() {
        let store = ScanStore::in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        for i in 0..3 {
            store.insert(&record_at(i, 0, 0.0)).unwrap();
        }
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_trends_oldest_first() {
        let store = ScanStore::in_memory().unwrap();
        for offset in [300, 0, 120] {
            store.insert(&record_at(offset, 0, 0.0)).unwrap();
        }
        let times: Vec<_> = store.trends().unwrap().iter().map(|r| r.scanned_at).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_recent_newest_first_with_limit() {
        let store = ScanStore::in_memory().unwrap();
        for offset in 0..5 {
            store.insert(&record_at(offset * 60, 0, 0.0)).unwrap();
        }
        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].scanned_at > recent[1].scanned_at);
        assert_eq!(recent[0].scanned_at, record_at(240, 0, 0.0).scanned_at);
    }

    #[test]
    fn test_metrics() {
        let store = ScanStore::in_memory().unwrap();
        assert_eq!(store.metrics().unwrap(), PlatformMetrics::default());

        store.insert(&record_at(0, 4, 7028.0)).unwrap();
        store.insert(&record_at(1, 1, 2128.0)).unwrap();
        store.insert(&record_at(2, 0, 0.0)).unwrap();

        let metrics = store.metrics().unwrap();
        assert_eq!(metrics.total_scans, 3);
        assert_eq!(metrics.total_deficiencies, 5);
        assert_eq!(metrics.total_cost, 9156.0);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["totalScans"], 3);
        assert_eq!(json["totalDeficiencies"], 5);
    }

    #[test]
    fn test_open_on_disk() {
        let path = std::env::temp_dir().join(format!("mittiscan-store-{}.db", Uuid::new_v4()));
        {
            let store = ScanStore::open(&path).unwrap();
            store.insert(&record_at(0, 2, 1400.0)).unwrap();
        }
        let reopened = ScanStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
