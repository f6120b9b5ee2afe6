// Vital sign classifiers and the aggregated status banner
use serde::Serialize;

const HR_LOW_LIMIT: f64 = 60.0;
const HR_LOW_CAUTION: f64 = 65.0;
const HR_HIGH_CAUTION: f64 = 110.0;
const HR_HIGH_LIMIT: f64 = 120.0;

const SPO2_LIMIT: f64 = 90.0;
const SPO2_CAUTION: f64 = 94.0;

/// Risk category of a single vital sign reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    OutOfRange,
    Caution,
    Normal,
    /// No numeric value to classify.
    Unknown,
}

impl VitalStatus {
    pub fn message(&self) -> &'static str {
        match self {
            VitalStatus::OutOfRange => "Fuera de rango. Acuda a un médico.",
            VitalStatus::Caution => "Precaución, vuelva a medir.",
            VitalStatus::Normal => "Todo normal.",
            VitalStatus::Unknown => "–",
        }
    }
}

/// Fetal heart rate in beats per minute.
pub fn classify_heart_rate(value: Option<f64>) -> VitalStatus {
    match value {
        None => VitalStatus::Unknown,
        Some(v) if v < HR_LOW_LIMIT || v > HR_HIGH_LIMIT => VitalStatus::OutOfRange,
        Some(v) if v < HR_LOW_CAUTION || v > HR_HIGH_CAUTION => VitalStatus::Caution,
        Some(_) => VitalStatus::Normal,
    }
}

/// Oxygen saturation in percent.
pub fn classify_spo2(value: Option<f64>) -> VitalStatus {
    match value {
        None => VitalStatus::Unknown,
        Some(v) if v < SPO2_LIMIT => VitalStatus::OutOfRange,
        Some(v) if v < SPO2_CAUTION => VitalStatus::Caution,
        Some(_) => VitalStatus::Normal,
    }
}

/// Dashboard-wide banner derived from both classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalStatus {
    Alert,
    Caution,
    InRange,
    Waiting,
}

impl GlobalStatus {
    /// Out of range wins over caution; an unclassifiable row still counts as in range.
    pub fn aggregate(heart_rate: VitalStatus, spo2: VitalStatus, has_reading: bool) -> Self {
        let statuses = [heart_rate, spo2];
        if statuses.contains(&VitalStatus::OutOfRange) {
            GlobalStatus::Alert
        } else if statuses.contains(&VitalStatus::Caution) {
            GlobalStatus::Caution
        } else if has_reading {
            GlobalStatus::InRange
        } else {
            GlobalStatus::Waiting
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GlobalStatus::Alert => "ALERTA: Parámetros fuera de rango",
            GlobalStatus::Caution => "Precaución",
            GlobalStatus::InRange => "En rango",
            GlobalStatus::Waiting => "Esperando datos…",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            GlobalStatus::Alert => "md-status md-status--err",
            GlobalStatus::Caution => "md-status md-status--warn",
            GlobalStatus::InRange => "md-status md-status--ok",
            GlobalStatus::Waiting => "md-status md-status--idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_bands() {
        for v in [0.0, 59.0, 59.6, 120.4, 121.0, 200.0] {
            assert_eq!(classify_heart_rate(Some(v)), VitalStatus::OutOfRange, "fc={v}");
        }
        for v in [60.0, 64.0, 110.4, 111.0, 120.0] {
            assert_eq!(classify_heart_rate(Some(v)), VitalStatus::Caution, "fc={v}");
        }
        for v in [65.0, 90.0, 110.0] {
            assert_eq!(classify_heart_rate(Some(v)), VitalStatus::Normal, "fc={v}");
        }
        assert_eq!(classify_heart_rate(None), VitalStatus::Unknown);
    }

    #[test]
    fn test_spo2_bands() {
        for v in [0.0, 80.0, 89.0, 89.6] {
            assert_eq!(classify_spo2(Some(v)), VitalStatus::OutOfRange, "spo2={v}");
        }
        for v in [90.0, 93.0, 93.9] {
            assert_eq!(classify_spo2(Some(v)), VitalStatus::Caution, "spo2={v}");
        }
        for v in [94.0, 99.0, 100.0] {
            assert_eq!(classify_spo2(Some(v)), VitalStatus::Normal, "spo2={v}");
        }
        assert_eq!(classify_spo2(None), VitalStatus::Unknown);
    }

    #[test]
    fn test_out_of_range_overrides_caution() {
        let status = GlobalStatus::aggregate(VitalStatus::Caution, VitalStatus::OutOfRange, true);
        assert_eq!(status, GlobalStatus::Alert);

        let status = GlobalStatus::aggregate(VitalStatus::OutOfRange, VitalStatus::Caution, true);
        assert_eq!(status, GlobalStatus::Alert);
    }

    #[test]
    fn test_banner_fallbacks() {
        assert_eq!(
            GlobalStatus::aggregate(VitalStatus::Normal, VitalStatus::Caution, true),
            GlobalStatus::Caution
        );
        assert_eq!(
            GlobalStatus::aggregate(VitalStatus::Unknown, VitalStatus::Unknown, true),
            GlobalStatus::InRange
        );
        assert_eq!(
            GlobalStatus::aggregate(VitalStatus::Unknown, VitalStatus::Unknown, false),
            GlobalStatus::Waiting
        );
    }
}
