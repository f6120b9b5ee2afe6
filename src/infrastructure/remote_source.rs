// Remote reading source implementation (JSON over HTTP GET)
use crate::application::reading_source::{ReadingSource, SourceError};
use crate::domain::query::{DateRange, QueryContext};
use crate::domain::reading::Reading;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RemoteReadingSource {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SourceResponse {
    #[serde(default)]
    ok: Value,
    #[serde(default)]
    data: Option<Vec<Reading>>,
}

impl RemoteReadingSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// `key` is always sent; the other filters only when non-empty.
    fn build_request_url(&self, context: &QueryContext, range: &DateRange) -> String {
        let mut params = vec![("key", context.key.as_str())];
        let optional = [
            ("patientId", context.patient_id.as_deref()),
            ("from", range.from.as_deref()),
            ("to", range.to.as_deref()),
        ];
        for (name, value) in optional {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                params.push((name, v));
            }
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base_url, separator, query)
    }
}

/// JavaScript-style truthiness of the `ok` flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl ReadingSource for RemoteReadingSource {
    async fn fetch_readings(
        &self,
        context: &QueryContext,
        range: &DateRange,
    ) -> Result<Vec<Reading>, SourceError> {
        let url = self.build_request_url(context, range);
        tracing::debug!(
            "Fetching readings: patient={:?}, from={:?}, to={:?}",
            context.patient_id,
            range.from,
            range.to
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<SourceResponse>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        if !is_truthy(&body.ok) {
            return Err(SourceError::NotOk);
        }

        Ok(body.data.unwrap_or_default())
    }
}
