//! Scorer verdict types.
//!
//! A verdict is the JSON document the scoring model returns for one article:
//! a trust level, extracted bylines, and up to three severity-scored detections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use tokio_rusqlite::rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::Error;

/// Highest severity the scale allows.
pub const MAX_SEVERITY: u8 = 10;

/// Detections below this severity are not reported.
pub const MIN_REPORTED_SEVERITY: u8 = 5;

/// At most this many detections are kept per verdict.
pub const MAX_DETECTIONS: usize = 3;

/// Overall trust classification of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Reliable,
    Questionable,
    Unreliable,
}

impl TrustLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLevel::Reliable => "reliable",
            TrustLevel::Questionable => "questionable",
            TrustLevel::Unreliable => "unreliable",
        }
    }

    /// Trust band implied by a maximum detection severity.
    ///
    /// ≤4 reliable, 5–7 questionable, ≥8 unreliable.
    pub fn for_severity(max_severity: u8) -> Self {
        match max_severity {
            0..=4 => TrustLevel::Reliable,
            5..=7 => TrustLevel::Questionable,
            _ => TrustLevel::Unreliable,
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown trust level string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown trust level: {0}")]
pub struct UnknownTrustLevel(pub String);

impl FromStr for TrustLevel {
    type Err = UnknownTrustLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reliable" => Ok(TrustLevel::Reliable),
            "questionable" => Ok(TrustLevel::Questionable),
            "unreliable" => Ok(TrustLevel::Unreliable),
            other => Err(UnknownTrustLevel(other.to_string())),
        }
    }
}

impl ToSql for TrustLevel {
    fn to_sql(&self) -> tokio_rusqlite::rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TrustLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A single flagged manipulation instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Detection {
    /// Category, e.g. `emotional_manipulation` or `missing_sources`.
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub description: String,
    /// 0 (negligible) to 10 (critical).
    #[serde(deserialize_with = "severity_from_number")]
    #[schemars(with = "u8")]
    pub severity: u8,
    #[serde(default)]
    pub example: String,
    /// Fields the model added beyond the documented shape, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept any JSON number with an integral value (`6` or `6.0`).
///
/// Values above [`MAX_SEVERITY`] but within `u8` are left for
/// [`Verdict::normalized`] to reject with context.
fn severity_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    let integral = match (number.as_u64(), number.as_f64()) {
        (Some(n), _) => Some(n),
        (None, Some(f)) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u8::MAX) => Some(f as u64),
        _ => None,
    };
    integral
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| de::Error::custom(format!("severity must be an integer from 0 to {MAX_SEVERITY}, got {number}")))
}

/// The scorer's structured assessment of one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Verdict {
    pub trust_level: TrustLevel,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
    /// Fields the model added beyond the documented shape, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Verdict {
    /// A verdict with no authors and no detections.
    pub fn new(trust_level: TrustLevel) -> Self {
        Self { trust_level, authors: Vec::new(), detections: Vec::new(), extra: Map::new() }
    }

    /// Parse the model's raw JSON answer and apply the reporting rules.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let verdict: Verdict =
            serde_json::from_str(raw.trim()).map_err(|e| Error::InvalidVerdict(format!("malformed verdict: {e}")))?;
        verdict.normalized()
    }

    /// Enforce the detection contract leniently.
    ///
    /// Severities above the scale are rejected. Detections below the
    /// reporting threshold are dropped, the rest ordered highest first and
    /// capped. The stated trust level is kept even when it disagrees with the
    /// severities.
    pub fn normalized(mut self) -> Result<Self, Error> {
        if let Some(bad) = self.detections.iter().find(|d| d.severity > MAX_SEVERITY) {
            return Err(Error::InvalidVerdict(format!(
                "severity {} out of range for detection '{}'",
                bad.severity, bad.label
            )));
        }

        let received = self.detections.len();
        self.detections.retain(|d| d.severity >= MIN_REPORTED_SEVERITY);
        self.detections.sort_by(|a, b| b.severity.cmp(&a.severity));
        self.detections.truncate(MAX_DETECTIONS);

        if self.detections.len() != received {
            tracing::debug!(received, kept = self.detections.len(), "trimmed scorer detections");
        }

        let implied = TrustLevel::for_severity(self.max_severity());
        if implied != self.trust_level {
            tracing::warn!(
                stated = %self.trust_level,
                implied = %implied,
                "scorer trust level disagrees with detection severities"
            );
        }

        Ok(self)
    }

    /// Highest severity among the kept detections, 0 when there are none.
    pub fn max_severity(&self) -> u8 {
        self.detections.iter().map(|d| d.severity).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(severity: u8) -> serde_json::Value {
        serde_json::json!({
            "type": "framing_bias",
            "label": format!("issue {severity}"),
            "description": "one-sided narrative",
            "severity": severity,
            "example": "\"critics slam\""
        })
    }

    #[test]
    fn test_parse_full_verdict() {
        let raw = serde_json::json!({
            "trust_level": "questionable",
            "authors": ["Jane Doe"],
            "detections": [detection(6)]
        })
        .to_string();

        let verdict = Verdict::parse(&raw).unwrap();
        assert_eq!(verdict.trust_level, TrustLevel::Questionable);
        assert_eq!(verdict.authors, vec!["Jane Doe".to_string()]);
        assert_eq!(verdict.detections.len(), 1);
        assert_eq!(verdict.detections[0].kind, "framing_bias");
    }

    #[test]
    fn test_lenient_filter_sort_and_cap() {
        let raw = serde_json::json!({
            "trust_level": "unreliable",
            "authors": [],
            "detections": [detection(6), detection(2), detection(9), detection(7)]
        })
        .to_string();

        let verdict = Verdict::parse(&raw).unwrap();
        let severities: Vec<u8> = verdict.detections.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![9, 7, 6]);
    }

    #[test]
    fn test_cap_after_filter() {
        let raw = serde_json::json!({
            "trust_level": "unreliable",
            "detections": [detection(5), detection(8), detection(10), detection(9), detection(6)]
        })
        .to_string();

        let verdict = Verdict::parse(&raw).unwrap();
        let severities: Vec<u8> = verdict.detections.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![10, 9, 8]);
    }

    #[test]
    fn test_severity_out_of_range() {
        let raw = serde_json::json!({ "trust_level": "unreliable", "detections": [detection(11)] }).to_string();
        assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(_))));
    }

    #[test]
    fn test_missing_trust_level() {
        let raw = serde_json::json!({ "authors": [], "detections": [] }).to_string();
        assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(_))));
    }

    #[test]
    fn test_unknown_trust_level() {
        let raw = serde_json::json!({ "trust_level": "mostly fine" }).to_string();
        assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Verdict::parse("{not json"), Err(Error::InvalidVerdict(_))));
        assert!(matches!(Verdict::parse(""), Err(Error::InvalidVerdict(_))));
    }

    #[test]
    fn test_detection_missing_severity() {
        let raw = serde_json::json!({
            "trust_level": "questionable",
            "detections": [{ "type": "x", "label": "y", "description": "z" }]
        })
        .to_string();
        assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(_))));
    }

    #[test]
    fn test_optional_fields_default() {
        let verdict = Verdict::parse(r#"{"trust_level":"reliable"}"#).unwrap();
        assert!(verdict.authors.is_empty());
        assert!(verdict.detections.is_empty());
        assert_eq!(verdict.max_severity(), 0);
    }

    #[test]
    fn test_stated_trust_level_kept() {
        let raw = serde_json::json!({ "trust_level": "reliable", "detections": [detection(9)] }).to_string();
        let verdict = Verdict::parse(&raw).unwrap();
        assert_eq!(verdict.trust_level, TrustLevel::Reliable);
    }

    #[test]
    fn test_trust_band() {
        assert_eq!(TrustLevel::for_severity(0), TrustLevel::Reliable);
        assert_eq!(TrustLevel::for_severity(4), TrustLevel::Reliable);
        assert_eq!(TrustLevel::for_severity(5), TrustLevel::Questionable);
        assert_eq!(TrustLevel::for_severity(7), TrustLevel::Questionable);
        assert_eq!(TrustLevel::for_severity(8), TrustLevel::Unreliable);
        assert_eq!(TrustLevel::for_severity(10), TrustLevel::Unreliable);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let mut d = detection(7);
        d["confidence"] = serde_json::json!(0.8);
        let raw = serde_json::json!({
            "trust_level": "questionable",
            "authors": [],
            "detections": [d],
            "summary": "model note"
        })
        .to_string();

        let verdict = Verdict::parse(&raw).unwrap();
        assert_eq!(verdict.extra["summary"], "model note");
        assert_eq!(verdict.detections[0].extra["confidence"], 0.8);

        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["summary"], "model note");
        assert_eq!(value["detections"][0]["confidence"], 0.8);
        assert_eq!(value["detections"][0]["type"], "framing_bias");
        assert!(value.get("extra").is_none());

        let reparsed: Verdict = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed, verdict);
    }

    #[test]
    fn test_integral_float_severity_accepted() {
        let mut d = detection(6);
        d["severity"] = serde_json::json!(6.0);
        let raw = serde_json::json!({ "trust_level": "questionable", "detections": [d] }).to_string();

        let verdict = Verdict::parse(&raw).unwrap();
        assert_eq!(verdict.detections[0].severity, 6);
    }

    #[test]
    fn test_fractional_or_negative_severity_rejected() {
        for bad in [serde_json::json!(6.5), serde_json::json!(-1), serde_json::json!(300)] {
            let mut d = detection(6);
            d["severity"] = bad;
            let raw = serde_json::json!({ "trust_level": "questionable", "detections": [d] }).to_string();
            assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(_))));
        }
    }

    #[test]
    fn test_float_severity_above_scale_rejected() {
        let mut d = detection(6);
        d["severity"] = serde_json::json!(11.0);
        let raw = serde_json::json!({ "trust_level": "unreliable", "detections": [d] }).to_string();
        assert!(matches!(Verdict::parse(&raw), Err(Error::InvalidVerdict(msg)) if msg.contains("out of range")));
    }

    #[test]
    fn test_detection_serializes_type_field() {
        let d: Detection = serde_json::from_value(detection(7)).unwrap();
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["type"], "framing_bias");
        assert!(value.get("kind").is_none());
    }
}
