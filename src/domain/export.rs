// CSV export of the reading history
use super::reading::{Reading, format_measurement};
use thiserror::Error;

pub const EXPORT_FILENAME: &str = "historial_fetalalert.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const HEADER: [&str; 5] = ["FECHA", "HORA", "FC", "SpO2", "PATADAS"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No hay datos para exportar")]
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub content: String,
}

/// Serialize rows into a CSV document, header first, lines joined by `\n`.
pub fn export_csv(rows: &[Reading]) -> Result<CsvExport, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.join(","));
    for row in rows {
        let fields = [
            row.fecha.clone().unwrap_or_default(),
            row.hora.clone().unwrap_or_default(),
            optional_number(row.fc),
            optional_number(row.spo2),
            optional_number(row.patadas),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| escape_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    Ok(CsvExport {
        filename: EXPORT_FILENAME,
        content: lines.join("\n"),
    })
}

fn optional_number(value: Option<f64>) -> String {
    value.map(format_measurement).unwrap_or_default()
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
