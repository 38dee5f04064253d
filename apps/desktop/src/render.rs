//! Text panels for the result and error regions.

use client_core::presenter::{ReportView, RiskTone};
use shared::error::SubmissionError;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    fn paint(self, tone: RiskTone, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match tone {
            RiskTone::Success => "32",
            RiskTone::Warning => "33",
            RiskTone::Danger => "31",
            RiskTone::Neutral => "90",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn bold(self, text: &str) -> String {
        if self.color {
            format!("\x1b[1m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn domain_list(domains: &[String]) -> String {
    if domains.is_empty() {
        "none".to_string()
    } else {
        domains.join(", ")
    }
}

pub fn error_panel(err: &SubmissionError, style: Style) -> String {
    format!(
        "{}\n{}\n",
        style.paint(RiskTone::Danger, "Error Occurred"),
        err
    )
}

pub fn report(view: &ReportView, style: Style, include_json: bool) -> String {
    let mut out = String::new();

    out.push_str(&style.bold("Your Health Risk Assessment"));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Overall Risk Level   {}\n",
        style.paint(view.tone, &view.risk_label)
    ));
    out.push_str(&format!(
        "Confidence Score     {} ({})\n",
        view.confidence_percent, view.confidence_level
    ));
    out.push_str(&format!(
        "                     {}\n",
        style.paint(view.tone, &bar(view.confidence_fraction))
    ));
    out.push_str(&format!("Primary driver       {}\n", view.primary_driver));
    out.push_str(&format!(
        "High-risk domains    {}\n",
        domain_list(&view.high_domains)
    ));
    out.push_str(&format!(
        "Moderate domains     {}\n",
        domain_list(&view.moderate_domains)
    ));

    out.push_str(&format!("\n{}\n", style.bold("Risk Indices Breakdown")));
    for row in &view.indices {
        let line = format!("  {:<20} {:>8}", row.label, row.value);
        if row.highlight {
            out.push_str(&style.bold(&line));
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", style.bold("Risk Category Probabilities")));
    for row in &view.probabilities {
        out.push_str(&format!(
            "  {:<14} {:>7} {}\n",
            row.label,
            row.percent,
            style.paint(row.tone, &bar(row.fraction))
        ));
    }

    if let Some(narrative) = &view.narrative {
        out.push_str(&format!("\n{}\n", style.bold("Personalized Recommendations")));
        out.push_str(narrative);
        if !narrative.ends_with('\n') {
            out.push('\n');
        }
    }

    if include_json {
        out.push_str(&format!(
            "\n{}\n{}\n",
            style.bold("Complete Technical Data (JSON)"),
            view.raw_json
        ));
    }

    out
}
