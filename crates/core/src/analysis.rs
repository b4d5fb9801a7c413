//! The structured result of one AI evaluation of a document.
//!
//! Field names are camelCase on the wire because the same shape is both
//! what the model is instructed to return and what clients receive.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Importance or severity bucket used by clauses and risks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    /// Case-insensitive parse; models are inconsistent about casing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Tier::High),
            "medium" => Some(Tier::Medium),
            "low" => Some(Tier::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Tier::parse(&raw).ok_or_else(|| {
            serde::de::Error::unknown_variant(&raw, &["high", "medium", "low"])
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyClause {
    pub clause: String,
    /// Section reference within the document, e.g. "Section 4.2".
    pub position: String,
    pub explanation: String,
    pub importance: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalTerm {
    pub term: String,
    pub definition: String,
    pub simplified_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub risk: String,
    pub severity: Tier,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub summary: String,
    #[serde(default)]
    pub key_clauses: Vec<KeyClause>,
    #[serde(default)]
    pub legal_terms: Vec<LegalTerm>,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
}

impl AnalysisRecord {
    /// Deterministic record used when the model's output cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            summary: "Unable to analyze document properly. The AI did not return a valid response. \
                      Please try with a different document or a smaller section."
                .to_string(),
            key_clauses: vec![KeyClause {
                clause: "Analysis incomplete".to_string(),
                position: "N/A".to_string(),
                explanation: "The document could not be analyzed due to formatting or content issues."
                    .to_string(),
                importance: Tier::High,
            }],
            legal_terms: Vec::new(),
            risk_factors: vec![RiskFactor {
                risk: "Document not properly analyzed".to_string(),
                severity: Tier::High,
                explanation: "Please ensure the document is text-based (not a scanned image) \
                              and try again with a smaller section."
                    .to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parse_ignores_case() {
        assert_eq!(Tier::parse("High"), Some(Tier::High));
        assert_eq!(Tier::parse(" MEDIUM "), Some(Tier::Medium));
        assert_eq!(Tier::parse("low"), Some(Tier::Low));
        assert_eq!(Tier::parse("critical"), None);
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let record = AnalysisRecord {
            summary: "A lease.".into(),
            key_clauses: vec![],
            legal_terms: vec![LegalTerm {
                term: "Lessee".into(),
                definition: "The party renting".into(),
                simplified_explanation: "The tenant".into(),
            }],
            risk_factors: vec![],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("keyClauses").is_some());
        assert!(value.get("riskFactors").is_some());
        assert_eq!(value["legalTerms"][0]["simplifiedExplanation"], "The tenant");
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let record: AnalysisRecord = serde_json::from_str(r#"{"summary":"x"}"#).unwrap();
        assert!(record.key_clauses.is_empty());
        assert!(record.legal_terms.is_empty());
        assert!(record.risk_factors.is_empty());
    }

    #[test]
    fn fallback_shape() {
        let fb = AnalysisRecord::fallback();
        assert!(!fb.summary.is_empty());
        assert_eq!(fb.key_clauses.len(), 1);
        assert_eq!(fb.key_clauses[0].position, "N/A");
        assert_eq!(fb.key_clauses[0].importance, Tier::High);
        assert!(fb.legal_terms.is_empty());
        assert_eq!(fb.risk_factors.len(), 1);
        assert_eq!(fb.risk_factors[0].severity, Tier::High);
        assert!(fb.risk_factors[0].explanation.contains("text-based"));
    }
}
