use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaViolation;

/// Predicted risk class. Labels the service may add later are kept verbatim in
/// `Other` instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
    Other(String),
}

impl RiskLabel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::High => "High",
            RiskLabel::Other(label) => label,
        }
    }
}

impl From<String> for RiskLabel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Low" => RiskLabel::Low,
            "Moderate" => RiskLabel::Moderate,
            "High" => RiskLabel::High,
            _ => RiskLabel::Other(value),
        }
    }
}

impl From<RiskLabel> for String {
    fn from(value: RiskLabel) -> Self {
        match value {
            RiskLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBlock {
    pub risk_label: RiskLabel,
    pub confidence: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriversBlock {
    pub primary: String,
    pub high_domains: Vec<String>,
    pub moderate_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicesBlock {
    pub posture_risk_index: f64,
    pub visual_strain_index: f64,
    pub cognitive_load_index: f64,
    pub msk_risk_index: f64,
    pub lifestyle_risk_index: f64,
    pub overall_risk_index: f64,
}

impl RiskIndicesBlock {
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("posture_risk_index", self.posture_risk_index),
            ("visual_strain_index", self.visual_strain_index),
            ("cognitive_load_index", self.cognitive_load_index),
            ("msk_risk_index", self.msk_risk_index),
            ("lifestyle_risk_index", self.lifestyle_risk_index),
            ("overall_risk_index", self.overall_risk_index),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProbabilitiesBlock {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

impl ModelProbabilitiesBlock {
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("low", self.low),
            ("moderate", self.moderate),
            ("high", self.high),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.low + self.moderate + self.high
    }
}

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub prediction: PredictionBlock,
    pub risk_drivers: RiskDriversBlock,
    pub risk_indices: RiskIndicesBlock,
    pub model_probabilities: ModelProbabilitiesBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_report: Option<String>,
}

impl ReportResponse {
    /// Checks value ranges the JSON shape alone cannot express.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_fraction(
            "prediction.confidence_score",
            self.prediction.confidence_score,
        )?;
        for (field, value) in self.model_probabilities.entries() {
            check_fraction(field, value)?;
        }
        for (field, value) in self.risk_indices.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(SchemaViolation::Index { field, value });
            }
        }
        Ok(())
    }

    /// Narrative text, treating an empty string the same as an absent one.
    pub fn narrative(&self) -> Option<&str> {
        self.rag_report.as_deref().filter(|text| !text.is_empty())
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), SchemaViolation> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SchemaViolation::Fraction { field, value })
    }
}
