//! Form layout: which fields belong to which section, and how they read back.

use shared::domain::{SurveyField, SurveyState};

pub const SECTIONS: &[(&str, &[SurveyField])] = &[
    ("Consent & Agreement", &[SurveyField::Consent]),
    (
        "Personal Details",
        &[
            SurveyField::AgeGroup,
            SurveyField::Department,
            SurveyField::Designation,
            SurveyField::ExperienceYears,
            SurveyField::MaritalStatus,
        ],
    ),
    (
        "Workload",
        &[
            SurveyField::TeachingHours,
            SurveyField::AdminHours,
            SurveyField::WeekendWork,
            SurveyField::RoleOverload,
            SurveyField::PublishPressure,
        ],
    ),
    (
        "Workspace Ergonomics",
        &[
            SurveyField::WorkspaceSetup,
            SurveyField::ScreenPosition,
            SurveyField::FeetSupport,
            SurveyField::SittingDuration,
            SurveyField::MostDiscomfortActivity,
        ],
    ),
    (
        "Lifestyle",
        &[
            SurveyField::SleepHours,
            SurveyField::PhysicalActivity,
            SurveyField::Hydration,
            SurveyField::CommuteTime,
        ],
    ),
    (
        "Discomfort (0-5)",
        &[
            SurveyField::NeckPain,
            SurveyField::LowerBackPain,
            SurveyField::WristPain,
            SurveyField::ShoulderPain,
            SurveyField::LegPain,
            SurveyField::EyeStrain,
        ],
    ),
    (
        "Well-being (WHO-5)",
        &[
            SurveyField::Who5Q1,
            SurveyField::Who5Q2,
            SurveyField::Who5Q3,
            SurveyField::Who5Q4,
            SurveyField::Who5Q5,
        ],
    ),
];

/// Every field with its allowed values and default.
pub fn field_listing() -> String {
    let defaults = SurveyState::default();
    let mut out = String::new();
    for (title, fields) in SECTIONS {
        out.push_str(&format!("{title}\n"));
        for field in *fields {
            out.push_str(&format!(
                "  {:<26} {}\n  {:<26} default: {}\n",
                field.wire_name(),
                field.domain(),
                "",
                defaults.value_of(*field)
            ));
        }
        out.push('\n');
    }
    out
}

/// Read-back of the answers about to be submitted.
pub fn summary(state: &SurveyState) -> String {
    let mut out = String::new();
    for (title, fields) in SECTIONS {
        out.push_str(&format!("{title}\n"));
        for field in *fields {
            out.push_str(&format!(
                "  {:<26} {}\n",
                field.wire_name(),
                state.value_of(*field)
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn sections_cover_every_field_once() {
        let listed: Vec<SurveyField> = SECTIONS
            .iter()
            .flat_map(|(_, fields)| fields.iter().copied())
            .collect();
        let unique: HashSet<SurveyField> = listed.iter().copied().collect();
        assert_eq!(listed.len(), SurveyField::ALL.len());
        assert_eq!(unique.len(), SurveyField::ALL.len());
    }

    #[test]
    fn listing_shows_domains_and_defaults() {
        let listing = field_listing();
        assert!(listing.contains("role_overload"));
        assert!(listing.contains("integer 1..=5"));
        assert!(listing.contains("default: Computer Science / AIML"));
    }

    #[test]
    fn summary_reads_back_current_values() {
        let summary = summary(&SurveyState::default());
        assert!(summary.contains("Well-being (WHO-5)"));
        assert!(summary.contains("Some of the time"));
        assert!(summary.contains("consent"));
    }
}
