// Query context resolution from the dashboard URL and filter form
use chrono::NaiveDate;
use serde::Serialize;

const KEY_PARAM: &str = "key";
const PATIENT_PARAM: &str = "patientId";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters that identify one fetch: the access key and an optional patient.
///
/// This is the part of the dashboard state that lives in the address bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryContext {
    pub key: String,
    pub patient_id: Option<String>,
}

impl QueryContext {
    pub fn new(key: impl Into<String>, patient_id: Option<String>) -> Self {
        Self {
            key: key.into(),
            patient_id: normalize(patient_id),
        }
    }

    /// Resolve `key` and `patientId` from a raw query string (without the `?`).
    pub fn from_query_string(query: &str, default_key: &str) -> Self {
        let pairs = parse_query_string(query);
        let lookup = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        let key = lookup(KEY_PARAM)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| default_key.to_string());

        Self::new(key, lookup(PATIENT_PARAM))
    }

    pub fn with_patient_id(&self, patient_id: Option<String>) -> Self {
        Self::new(self.key.clone(), patient_id)
    }

    /// Canonical query string for this context alone.
    pub fn to_query_string(&self) -> String {
        canonical_query("", self.patient_id.as_deref(), &self.key)
    }
}

/// Optional date bounds from the filter form. Never written to the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    /// Blank bounds are dropped; bounds that are not `YYYY-MM-DD` dates are
    /// dropped with a warning.
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: validate_date("from", from),
            to: validate_date("to", to),
        }
    }
}

fn validate_date(field: &str, value: Option<&str>) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(_) => Some(value.to_string()),
        Err(e) => {
            tracing::warn!("Ignoring invalid {} date {:?}: {}", field, value, e);
            None
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a query string into decoded `(name, value)` pairs, keeping order.
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Merge the patient id and key into an existing query string.
///
/// Unrelated parameters keep their position. A blank patient id removes
/// `patientId`; the key is always present in the result.
pub fn canonical_query(current: &str, patient_id: Option<&str>, key: &str) -> String {
    let mut pairs = parse_query_string(current);

    match patient_id.map(str::trim).filter(|p| !p.is_empty()) {
        Some(pid) => set_param(&mut pairs, PATIENT_PARAM, pid),
        None => pairs.retain(|(k, _)| k != PATIENT_PARAM),
    }
    set_param(&mut pairs, KEY_PARAM, key);

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn set_param(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == name) {
        Some(idx) => {
            pairs[idx].1 = value.to_string();
            let mut seen = 0;
            pairs.retain(|(k, _)| {
                if k != name {
                    return true;
                }
                seen += 1;
                seen == 1
            });
        }
        None => pairs.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_default_key() {
        let ctx = QueryContext::from_query_string("", "DEFAULT");
        assert_eq!(ctx.key, "DEFAULT");
        assert_eq!(ctx.patient_id, None);

        let ctx = QueryContext::from_query_string("key=&patientId=", "DEFAULT");
        assert_eq!(ctx.key, "DEFAULT");
        assert_eq!(ctx.patient_id, None);
    }

    #[test]
    fn test_resolve_decodes_values() {
        let ctx = QueryContext::from_query_string("?key=abc%2F123&patientId=Ana+P%C3%A9rez", "D");
        assert_eq!(ctx.key, "abc/123");
        assert_eq!(ctx.patient_id.as_deref(), Some("Ana Pérez"));
    }

    #[test]
    fn test_canonical_query_sets_patient_and_keeps_other_params() {
        let query = canonical_query("lang=es&patientId=old", Some(" P-7 "), "secret");
        assert_eq!(query, "lang=es&patientId=P-7&key=secret");
    }

    #[test]
    fn test_canonical_query_removes_blank_patient() {
        let query = canonical_query("key=k&patientId=P-1&patientId=P-2", Some("  "), "k");
        assert_eq!(query, "key=k");
    }

    #[test]
    fn test_canonical_query_round_trips_through_resolver() {
        let query = canonical_query("", Some("Ana Pérez"), "k&1");
        let ctx = QueryContext::from_query_string(&query, "D");
        assert_eq!(ctx, QueryContext::new("k&1", Some("Ana Pérez".to_string())));
    }

    #[test]
    fn test_date_range_drops_blank_and_invalid_bounds() {
        let range = DateRange::new(Some("2024-01-01"), Some(""));
        assert_eq!(range.from.as_deref(), Some("2024-01-01"));
        assert_eq!(range.to, None);

        let range = DateRange::new(Some("01/02/2024"), Some("2024-02-30"));
        assert_eq!(range, DateRange::default());
    }
}
