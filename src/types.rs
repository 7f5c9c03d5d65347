//! Core types for parkstat

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One observed parking transaction, as the backend sends it.
///
/// `waktu_parkir` is the only field the filter looks at. Everything else is
/// carried through untouched: the known fields as optionals, anything the
/// backend adds later in the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// ISO-8601 date-time string, the moment the transaction occurred
    pub waktu_parkir: String,
    /// Vehicle type (e.g., "motor", "mobil")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenis_kendaraan: Option<String>,
    /// License plate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plat_nomor: Option<String>,
    /// Parking fee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biaya: Option<f64>,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TransactionRecord {
    /// Bare record with only a timestamp, for building test fixtures.
    #[cfg(test)]
    pub fn at(waktu_parkir: &str) -> Self {
        Self {
            waktu_parkir: waktu_parkir.to_string(),
            jenis_kendaraan: None,
            plat_nomor: None,
            biaya: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Success body of `GET /api/statistic/transaksi`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub transaksi: Vec<TransactionRecord>,
    #[serde(rename = "totalTransaksi")]
    pub total_transaksi: u64,
}

/// Named relative time window for filtering transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeRangeSelection {
    #[default]
    Today,
    #[value(name = "7days")]
    Last7Days,
    #[value(name = "1month")]
    Last30Days,
    #[value(name = "1year")]
    LastYear,
    /// No window, pass everything through
    All,
}

impl fmt::Display for TimeRangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRangeSelection::Today => write!(f, "today"),
            TimeRangeSelection::Last7Days => write!(f, "last 7 days"),
            TimeRangeSelection::Last30Days => write!(f, "last 30 days"),
            TimeRangeSelection::LastYear => write!(f, "last year"),
            TimeRangeSelection::All => write!(f, "all time"),
        }
    }
}

/// Same-day start/end time-of-day pair, shown alongside the `today` range.
///
/// Advisory only: it annotates the report header and is never applied by the
/// filter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl fmt::Display for ClockWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// CLI output format
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrips_unknown_fields() {
        let raw = r#"{
            "waktu_parkir": "2024-06-15T08:30:00",
            "jenis_kendaraan": "motor",
            "biaya": 2000.0,
            "lantai": 3,
            "petugas": "budi"
        }"#;

        let record: TransactionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.waktu_parkir, "2024-06-15T08:30:00");
        assert_eq!(record.jenis_kendaraan.as_deref(), Some("motor"));
        assert_eq!(record.extra.get("lantai"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["petugas"], "budi");
        assert_eq!(back["lantai"], 3);
    }

    #[test]
    fn statistics_response_decodes_wire_names() {
        let raw = r#"{
            "transaksi": [{"waktu_parkir": "2024-06-15T08:30:00"}],
            "totalTransaksi": 42
        }"#;

        let response: StatisticsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.transaksi.len(), 1);
        assert_eq!(response.total_transaksi, 42);
    }
}
