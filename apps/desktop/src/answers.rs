//! Answers files: a JSON or TOML object of wire-named fields. Missing fields
//! keep their defaults; present ones must already be in-domain.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use shared::domain::{SurveyField, SurveyState};

pub fn load(path: &Path) -> Result<SurveyState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file '{}'", path.display()))?;

    let overrides = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let table: toml::Value = toml::from_str(&raw)
                .with_context(|| format!("failed to parse TOML answers '{}'", path.display()))?;
            serde_json::to_value(table)?
        }
        _ => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON answers '{}'", path.display()))?,
    };

    merge_onto_defaults(overrides)
        .with_context(|| format!("invalid answers in '{}'", path.display()))
}

pub fn merge_onto_defaults(overrides: Value) -> Result<SurveyState> {
    let Value::Object(overrides) = overrides else {
        bail!("answers must be a single object of field values");
    };

    let mut merged = serde_json::to_value(SurveyState::default())?;
    let fields = merged
        .as_object_mut()
        .context("survey state did not encode as an object")?;
    for (name, value) in overrides {
        name.parse::<SurveyField>()?;
        fields.insert(name, value);
    }

    Ok(serde_json::from_value(merged)?)
}
