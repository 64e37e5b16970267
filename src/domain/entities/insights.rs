//! Risk insight entities returned by the scoring backend.

use serde::{Deserialize, Serialize};

/// Whether a contributing factor helps or hurts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Positive,
    Negative,
}

/// One factor contributing to the risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub value: i32,
    pub percentage: i32,
    #[serde(rename = "type")]
    pub kind: FactorKind,
}

/// Overall risk score (0-100) with its label and factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskData {
    pub score: i32,
    pub label: String,
    #[serde(default)]
    pub factors: Vec<RiskFactor>,
}

/// Severity band used to color the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskData {
    /// Band for the numeric score.
    #[must_use]
    pub const fn band(&self) -> RiskBand {
        if self.score >= 70 {
            RiskBand::High
        } else if self.score >= 40 {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    /// Score clamped to `0..=100` as a fraction.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.score.clamp(0, 100)) / 100.0
    }
}

/// Forward-looking risk summary attached to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureRisk {
    pub score: i32,
    pub label: String,
    #[serde(default)]
    pub prediction: String,
}

/// Dashboard payload. Chart series are kept as raw JSON and not interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub sleep_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub activity_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub interaction_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub future_risk: Option<FutureRisk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_risk_deserializes_factor_type() {
        let json = r#"{
            "score": 62,
            "label": "Moderate",
            "factors": [
                {"name": "Reduced sleep", "value": 50, "percentage": 10, "type": "negative"},
                {"name": "Stable Behavior", "value": 90, "percentage": 0, "type": "positive"}
            ]
        }"#;

        let risk: RiskData = serde_json::from_str(json).unwrap();

        assert_eq!(risk.factors.len(), 2);
        assert_eq!(risk.factors[0].kind, FactorKind::Negative);
        assert_eq!(risk.band(), RiskBand::Moderate);
    }

    #[test_case(0, RiskBand::Low)]
    #[test_case(39, RiskBand::Low)]
    #[test_case(40, RiskBand::Moderate)]
    #[test_case(70, RiskBand::High)]
    fn test_band_thresholds(score: i32, band: RiskBand) {
        let risk = RiskData {
            score,
            label: String::new(),
            factors: Vec::new(),
        };
        assert_eq!(risk.band(), band);
    }

    #[test]
    fn test_ratio_clamped() {
        let risk = RiskData {
            score: 140,
            label: "High".into(),
            factors: Vec::new(),
        };
        assert!((risk.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dashboard_without_future_risk() {
        let json = r#"{"sleep_data":[{"name":"Mon","score":65}],"activity_data":[],"interaction_data":[]}"#;
        let dashboard: DashboardData = serde_json::from_str(json).unwrap();
        assert!(dashboard.future_risk.is_none());
        assert_eq!(dashboard.sleep_data.len(), 1);
    }
}
