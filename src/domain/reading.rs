// Reading domain model
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One fetal-monitoring observation as returned by the remote source.
///
/// Fields are decoded leniently so that one odd cell never rejects the
/// whole response: numeric fields keep any JSON number as-is and treat
/// everything else as absent; text fields accept strings, numbers and
/// booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hora: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fc: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub spo2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub patadas: Option<f64>,
}

impl Reading {
    pub fn new(
        fecha: impl Into<String>,
        hora: impl Into<String>,
        fc: Option<f64>,
        spo2: Option<f64>,
        patadas: Option<f64>,
    ) -> Self {
        Self {
            fecha: Some(fecha.into()),
            hora: Some(hora.into()),
            fc,
            spo2,
            patadas,
        }
    }
}

/// Render a measurement without a trailing `.0` for whole numbers.
pub fn format_measurement(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}
