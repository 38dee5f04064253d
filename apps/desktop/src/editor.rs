//! Command-line field editor. Each `FIELD=VALUE` assignment becomes one
//! `SurveyState::update`; numeric input clamps into the field's range.

use anyhow::{anyhow, Context, Result};
use shared::domain::{FieldUpdate, SurveyField, SurveyState};
use tracing::debug;

pub fn parse_assignment(raw: &str) -> Result<FieldUpdate> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    let field: SurveyField = name.parse()?;
    Ok(FieldUpdate::from_input(field, value)?)
}

pub fn apply_assignments(state: SurveyState, assignments: &[String]) -> Result<SurveyState> {
    assignments.iter().try_fold(state, |state, raw| {
        let change = parse_assignment(raw).with_context(|| format!("invalid --set '{raw}'"))?;
        debug!(field = %change.field(), "field edited");
        Ok(state.update(change))
    })
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::{Frequency, YesNo},
        error::FieldError,
    };

    use super::*;

    #[test]
    fn assignments_apply_in_order() {
        let state = apply_assignments(
            SurveyState::default(),
            &[
                "consent=No".to_string(),
                "neck_pain=2".to_string(),
                "neck_pain=4".to_string(),
                "who5_q2=Most of the time".to_string(),
                "department=Civil = Structural".to_string(),
            ],
        )
        .expect("apply");

        assert_eq!(state.consent, YesNo::No);
        assert_eq!(state.neck_pain.get(), 4);
        assert_eq!(state.who5_q2, Frequency::MostOfTheTime);
        assert_eq!(state.department, "Civil = Structural");
    }

    #[test]
    fn numeric_input_is_clamped() {
        let state = apply_assignments(
            SurveyState::default(),
            &["admin_hours=90".to_string(), "role_overload=-2".to_string()],
        )
        .expect("apply");
        assert_eq!(state.admin_hours.get(), 60);
        assert_eq!(state.role_overload.get(), 1);
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(parse_assignment("neck_pain").is_err());

        let err = parse_assignment("posture=good").expect_err("unknown field");
        assert!(matches!(
            err.downcast_ref::<FieldError>(),
            Some(FieldError::UnknownField(name)) if name == "posture"
        ));

        let err = parse_assignment("hydration=lots").expect_err("unlisted option");
        assert!(matches!(
            err.downcast_ref::<FieldError>(),
            Some(FieldError::UnknownOption { .. })
        ));
    }
}
