//! Display-ready view of a [`ReportResponse`]. Everything here is pure.

use shared::protocol::{ReportResponse, RiskLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTone {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl RiskTone {
    /// Unrecognized labels fall back to `Neutral`.
    pub fn for_label(label: &RiskLabel) -> Self {
        match label {
            RiskLabel::Low => RiskTone::Success,
            RiskLabel::Moderate => RiskTone::Warning,
            RiskLabel::High => RiskTone::Danger,
            RiskLabel::Other(_) => RiskTone::Neutral,
        }
    }

    pub fn css_var(self) -> &'static str {
        match self {
            RiskTone::Success => "var(--success)",
            RiskTone::Warning => "var(--warning)",
            RiskTone::Danger => "var(--danger)",
            RiskTone::Neutral => "var(--text-secondary)",
        }
    }
}

/// `0.873` -> `"87.3%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", fixed(fraction * 100.0, 1))
}

/// `4.0` -> `"4.00"`.
pub fn format_index(value: f64) -> String {
    fixed(value, 2)
}

/// Fixed-point text with exact halves rounded away from zero; `{:.N}` alone
/// would round them to even.
fn fixed(value: f64, decimals: usize) -> String {
    let exponent = decimals as i32;
    // A decimal tie at `decimals` places has at most `decimals + 1` binary
    // fraction digits, and scaling by a power of two is exact.
    let exact_tie = value.is_finite()
        && (value * 2f64.powi(exponent + 1)).fract() == 0.0
        && (value * 10f64.powi(exponent)).fract().abs() == 0.5;
    if exact_tie {
        let factor = 10f64.powi(exponent);
        return format!("{:.*}", decimals, (value * factor).round() / factor);
    }
    format!("{value:.decimals$}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: String,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityRow {
    pub label: &'static str,
    pub percent: String,
    pub fraction: f64,
    pub tone: RiskTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub risk_label: String,
    pub tone: RiskTone,
    pub confidence_level: String,
    pub confidence_percent: String,
    pub confidence_fraction: f64,
    pub primary_driver: String,
    pub high_domains: Vec<String>,
    pub moderate_domains: Vec<String>,
    pub indices: Vec<MetricRow>,
    pub probabilities: Vec<ProbabilityRow>,
    /// Literal text; `None` means the narrative panel is not rendered at all.
    pub narrative: Option<String>,
    pub raw_json: String,
}

pub fn present(report: &ReportResponse) -> serde_json::Result<ReportView> {
    let indices = &report.risk_indices;
    let probabilities = &report.model_probabilities;

    let metric = |label, value, highlight| MetricRow {
        label,
        value: format_index(value),
        highlight,
    };
    let probability = |label, fraction, tone| ProbabilityRow {
        label,
        percent: format_percent(fraction),
        fraction,
        tone,
    };

    Ok(ReportView {
        risk_label: report.prediction.risk_label.to_string(),
        tone: RiskTone::for_label(&report.prediction.risk_label),
        confidence_level: report.prediction.confidence.clone(),
        confidence_percent: format_percent(report.prediction.confidence_score),
        confidence_fraction: report.prediction.confidence_score,
        primary_driver: report.risk_drivers.primary.clone(),
        high_domains: report.risk_drivers.high_domains.clone(),
        moderate_domains: report.risk_drivers.moderate_domains.clone(),
        indices: vec![
            metric("Posture Risk", indices.posture_risk_index, false),
            metric("Visual Strain", indices.visual_strain_index, false),
            metric("Cognitive Load", indices.cognitive_load_index, false),
            metric("Musculoskeletal", indices.msk_risk_index, false),
            metric("Lifestyle", indices.lifestyle_risk_index, false),
            metric("Overall Risk Index", indices.overall_risk_index, true),
        ],
        probabilities: vec![
            probability("Low Risk", probabilities.low, RiskTone::Success),
            probability("Moderate Risk", probabilities.moderate, RiskTone::Warning),
            probability("High Risk", probabilities.high, RiskTone::Danger),
        ],
        narrative: report.narrative().map(str::to_string),
        raw_json: serde_json::to_string_pretty(report)?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn report(label: &str, rag_report: Option<&str>) -> ReportResponse {
        let mut body = json!({
            "prediction": { "risk_label": label, "confidence": "Very High", "confidence_score": 0.873 },
            "risk_drivers": {
                "primary": "posture",
                "high_domains": ["posture"],
                "moderate_domains": ["msk"]
            },
            "risk_indices": {
                "posture_risk_index": 4.0,
                "visual_strain_index": 12.345,
                "cognitive_load_index": 0.0,
                "msk_risk_index": 51.5,
                "lifestyle_risk_index": 7.125,
                "overall_risk_index": 66.666
            },
            "model_probabilities": { "low": 0.412, "moderate": 0.5, "high": 0.088 }
        });
        if let Some(text) = rag_report {
            body["rag_report"] = json!(text);
        }
        serde_json::from_value(body).expect("report")
    }

    #[test]
    fn tones_follow_known_labels() {
        assert_eq!(RiskTone::for_label(&RiskLabel::Low), RiskTone::Success);
        assert_eq!(RiskTone::for_label(&RiskLabel::Moderate), RiskTone::Warning);
        assert_eq!(RiskTone::for_label(&RiskLabel::High), RiskTone::Danger);
    }

    #[test]
    fn unknown_label_gets_neutral_tone() {
        let view = present(&report("Unknown", None)).expect("view");
        assert_eq!(view.tone, RiskTone::Neutral);
        assert_eq!(view.risk_label, "Unknown");
        assert_eq!(view.tone.css_var(), "var(--text-secondary)");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(format_index(0.125), "0.13");
        assert_eq!(format_index(2.375), "2.38");
        assert_eq!(format_index(-0.125), "-0.13");
        assert_eq!(format_percent(0.3125), "31.3%");
        assert_eq!(format_percent(0.0625), "6.3%");
        // Stored just off the half in binary, so these follow the exact value.
        assert_eq!(format_index(1.005), "1.00");
        assert_eq!(format_index(12.345), "12.35");

        let view = present(&report("Moderate", None)).expect("view");
        assert_eq!(view.indices[4].value, "7.13");
    }

    #[test]
    fn formats_percentages_and_indices() {
        assert_eq!(format_percent(0.873), "87.3%");
        assert_eq!(format_percent(0.412), "41.2%");
        assert_eq!(format_percent(0.91), "91.0%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_index(4.0), "4.00");
        assert_eq!(format_index(66.666), "66.67");

        let view = present(&report("Moderate", None)).expect("view");
        assert_eq!(view.confidence_percent, "87.3%");
        assert_eq!(view.indices[0].value, "4.00");
        assert_eq!(view.indices[5].label, "Overall Risk Index");
        assert!(view.indices[5].highlight);
        assert_eq!(view.probabilities[0].percent, "41.2%");
        assert_eq!(view.probabilities[1].percent, "50.0%");
    }

    #[test]
    fn narrative_visible_only_when_non_empty() {
        assert!(present(&report("Low", None)).expect("view").narrative.is_none());
        assert!(present(&report("Low", Some(""))).expect("view").narrative.is_none());

        let text = "1. Raise the monitor.\n2. <b>Stretch</b> hourly.";
        let view = present(&report("Low", Some(text))).expect("view");
        assert_eq!(view.narrative.as_deref(), Some(text));
    }

    #[test]
    fn raw_json_is_pretty_and_complete() {
        let original = report("High", Some("notes"));
        let view = present(&original).expect("view");
        assert!(view.raw_json.contains("\n  \"prediction\""));
        let decoded: ReportResponse = serde_json::from_str(&view.raw_json).expect("decode");
        assert_eq!(decoded, original);
    }
}
