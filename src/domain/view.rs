// Dashboard presentation model
use super::connection::ConnectionState;
use super::reading::{Reading, format_measurement};
use super::vitals::{GlobalStatus, VitalStatus, classify_heart_rate, classify_spo2};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of history rows shown in the table.
pub const TABLE_ROW_LIMIT: usize = 50;

pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub date: String,
    pub time: String,
    pub heart_rate: String,
    pub spo2: String,
    pub movements: String,
    pub heart_rate_status: VitalStatus,
    pub spo2_status: VitalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: String,
    pub time: String,
    pub heart_rate: String,
    pub spo2: String,
    pub movements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub connection: ConnectionState,
    pub summary: SummaryView,
    pub banner: GlobalStatus,
    pub table: Vec<TableRow>,
    pub total_rows: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardView {
    /// Summary comes from the first row; rows are never reordered.
    pub fn build(
        rows: &[Reading],
        connection: ConnectionState,
        refreshed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let latest = rows.first();
        let summary = SummaryView::from_latest(latest);
        let banner = GlobalStatus::aggregate(
            summary.heart_rate_status,
            summary.spo2_status,
            latest.is_some(),
        );

        let table = rows
            .iter()
            .take(TABLE_ROW_LIMIT)
            .map(TableRow::from_reading)
            .collect();

        Self {
            connection,
            summary,
            banner,
            table,
            total_rows: rows.len(),
            refreshed_at,
        }
    }
}

impl SummaryView {
    fn from_latest(latest: Option<&Reading>) -> Self {
        let fc = latest.and_then(|r| r.fc);
        let spo2 = latest.and_then(|r| r.spo2);

        Self {
            date: text_or_placeholder(latest.and_then(|r| r.fecha.as_deref())),
            time: text_or_placeholder(latest.and_then(|r| r.hora.as_deref())),
            heart_rate: number_or_placeholder(fc),
            spo2: number_or_placeholder(spo2),
            movements: number_or_placeholder(latest.and_then(|r| r.patadas)),
            heart_rate_status: classify_heart_rate(fc),
            spo2_status: classify_spo2(spo2),
        }
    }
}

impl TableRow {
    fn from_reading(reading: &Reading) -> Self {
        Self {
            date: text_or_placeholder(reading.fecha.as_deref()),
            time: text_or_placeholder(reading.hora.as_deref()),
            heart_rate: number_or_placeholder(reading.fc),
            spo2: number_or_placeholder(reading.spo2),
            movements: number_or_placeholder(reading.patadas),
        }
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn number_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_measurement)
}
