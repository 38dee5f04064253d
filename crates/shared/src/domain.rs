//! Survey answer model.
//!
//! Every field of [`SurveyState`] holds a value from a closed or bounded domain,
//! so a snapshot is always structurally complete and in-domain. Enumerated
//! answers are enums whose wire form is the exact option text; bounded integers
//! are newtypes that refuse out-of-range values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, OutOfRange};

/// Allowed values of one survey field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    Options(Vec<&'static str>),
    Range { min: u8, max: u8 },
    FreeText,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Options(options) => write!(f, "one of: {}", options.join(" | ")),
            Domain::Range { min, max } => write!(f, "integer {min}..={max}"),
            Domain::FreeText => f.write_str("free text"),
        }
    }
}

pub trait FieldDomain {
    fn domain() -> Domain;
}

/// How an editor control turns raw user input into a field value.
///
/// Numeric editors clamp into the field's range; option editors accept only a
/// listed option (case-insensitive).
pub trait EditorInput: Sized {
    fn from_input(raw: &str) -> Result<Self, FieldError>;
}

macro_rules! survey_options {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| FieldError::UnknownOption {
                        domain: stringify!($name),
                        value: raw.to_string(),
                        allowed: Self::ALL.iter().map(|option| option.as_str()).collect(),
                    })
            }
        }

        impl FieldDomain for $name {
            fn domain() -> Domain {
                Domain::Options(Self::ALL.iter().map(|option| option.as_str()).collect())
            }
        }

        impl EditorInput for $name {
            fn from_input(raw: &str) -> Result<Self, FieldError> {
                raw.parse()
            }
        }
    };
}

macro_rules! bounded_score {
    ($(#[$meta:meta])* $name:ident, $min:literal..=$max:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(u8);

        impl $name {
            pub const MIN: u8 = $min;
            pub const MAX: u8 = $max;

            pub fn new(value: i64) -> Result<Self, OutOfRange> {
                u8::try_from(value)
                    .ok()
                    .filter(|value| (Self::MIN..=Self::MAX).contains(value))
                    .map(Self)
                    .ok_or(OutOfRange {
                        domain: stringify!($name),
                        value,
                        min: Self::MIN,
                        max: Self::MAX,
                    })
            }

            /// Nearest in-range value.
            pub fn saturating(value: i64) -> Self {
                // Clamped into MIN..=MAX, which always fits a u8.
                Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
            }

            pub fn get(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = OutOfRange;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                i64::from(value.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FieldDomain for $name {
            fn domain() -> Domain {
                Domain::Range {
                    min: Self::MIN,
                    max: Self::MAX,
                }
            }
        }

        impl EditorInput for $name {
            fn from_input(raw: &str) -> Result<Self, FieldError> {
                let raw = raw.trim();
                raw.parse::<i64>()
                    .map(Self::saturating)
                    .map_err(|_| FieldError::InvalidNumber {
                        domain: stringify!($name),
                        value: raw.to_string(),
                    })
            }
        }
    };
}

impl FieldDomain for String {
    fn domain() -> Domain {
        Domain::FreeText
    }
}

impl EditorInput for String {
    fn from_input(raw: &str) -> Result<Self, FieldError> {
        Ok(raw.to_string())
    }
}

survey_options!(YesNo {
    Yes => "Yes",
    No => "No",
});

survey_options!(AgeGroup {
    From18To25 => "18-25",
    From26To30 => "26-30",
    From31To40 => "31-40",
    From41To50 => "41-50",
    Over50 => "50+",
});

survey_options!(Designation {
    Student => "Student",
    Professor => "Professor",
    AssistantProfessor => "Assistant Professor",
    AssociateProfessor => "Associate Professor",
    Researcher => "Researcher",
    Staff => "Staff",
});

survey_options!(ExperienceBand {
    UpTo1 => "0-1",
    From2To5 => "2-5",
    From6To10 => "6-10",
    From11To15 => "11-15",
    Over15 => "15+",
});

survey_options!(MaritalStatus {
    Single => "Single",
    Married => "Married",
    Other => "Other",
});

survey_options!(WeekendWork {
    Never => "Never",
    Rarely => "Rarely",
    Sometimes => "Sometimes",
    Often => "Often",
    Always => "Always",
});

survey_options!(WorkspaceSetup {
    BasicChairAndTable => "Basic Chair and Table",
    AdjustableChairAndSetup => "Adjustable Chair and Setup",
    StandingDeskSetup => "Standing Desk Setup",
    PoorSetup => "Poor Setup",
});

survey_options!(ScreenPosition {
    BelowEyeLevel => "Below eye level",
    AtEyeLevel => "At eye level",
    AboveEyeLevel => "Above eye level",
});

survey_options!(
    /// Time band shared by continuous sitting and daily commute.
    DurationBand {
        UnderHalfHour => "Less than 30 mins",
        HalfHourToHour => "30 mins - 1 hour",
        OneToTwoHours => "1 - 2 hours",
        OverTwoHours => "More than 2 hours",
    }
);

survey_options!(DiscomfortActivity {
    Sitting => "Sitting",
    Standing => "Standing",
    Walking => "Walking",
    Typing => "Typing",
});

survey_options!(SleepDuration {
    UnderFive => "Less than 5 hours",
    FiveToSix => "5 - 6 hours",
    SixToSeven => "6 - 7 hours",
    SevenToEight => "7 - 8 hours",
    OverEight => "More than 8 hours",
});

survey_options!(ActivityLevel {
    Sedentary => "Sedentary (No Exercise)",
    Light => "Light Activity (Walking)",
    Moderate => "Moderate Activity (Gym / Yoga)",
    High => "High Activity (Sports / Running)",
});

survey_options!(Hydration {
    UnderOneLitre => "Less than 1 litre",
    OneToTwoLitres => "1 - 2 litres",
    OverTwoLitres => "More than 2 litres",
});

survey_options!(
    /// WHO-5 six-point frequency scale.
    Frequency {
        AtNoTime => "At no time",
        SomeOfTheTime => "Some of the time",
        LessThanHalf => "Less than half of the time",
        MoreThanHalf => "More than half of the time",
        MostOfTheTime => "Most of the time",
        AllOfTheTime => "All of the time",
    }
);

bounded_score!(
    /// Hours per week spent on one kind of work.
    WeeklyHours,
    0..=60
);

bounded_score!(
    /// Self-rated role overload.
    OverloadRating,
    1..=5
);

bounded_score!(
    /// Self-rated discomfort for one body region.
    DiscomfortScore,
    0..=5
);

macro_rules! survey_fields {
    ($($field:ident: $ty:ty => $variant:ident),+ $(,)?) => {
        /// One complete set of survey answers. Serialized flat, in declaration
        /// order, with the wire names below.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct SurveyState {
            $(pub $field: $ty,)+
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SurveyField {
            $($variant,)+
        }

        impl SurveyField {
            pub const ALL: &'static [SurveyField] = &[$(SurveyField::$variant),+];

            pub fn wire_name(self) -> &'static str {
                match self {
                    $(SurveyField::$variant => stringify!($field),)+
                }
            }

            pub fn domain(self) -> Domain {
                match self {
                    $(SurveyField::$variant => <$ty as FieldDomain>::domain(),)+
                }
            }
        }

        /// A single-field change: the field and its new value.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum FieldUpdate {
            $($variant($ty),)+
        }

        impl FieldUpdate {
            pub fn field(&self) -> SurveyField {
                match self {
                    $(FieldUpdate::$variant(_) => SurveyField::$variant,)+
                }
            }

            /// Builds an update from editor text for `field`.
            pub fn from_input(field: SurveyField, raw: &str) -> Result<Self, FieldError> {
                match field {
                    $(SurveyField::$variant => {
                        <$ty as EditorInput>::from_input(raw).map(FieldUpdate::$variant)
                    })+
                }
            }
        }

        impl SurveyState {
            /// Returns a new snapshot with exactly one field replaced. `self` is
            /// left untouched.
            #[must_use]
            pub fn update(&self, change: FieldUpdate) -> SurveyState {
                let mut next = self.clone();
                match change {
                    $(FieldUpdate::$variant(value) => next.$field = value,)+
                }
                next
            }

            /// Display text of the current value of `field`.
            pub fn value_of(&self, field: SurveyField) -> String {
                match field {
                    $(SurveyField::$variant => self.$field.to_string(),)+
                }
            }
        }
    };
}

survey_fields! {
    consent: YesNo => Consent,

    age_group: AgeGroup => AgeGroup,
    department: String => Department,
    designation: Designation => Designation,
    experience_years: ExperienceBand => ExperienceYears,
    marital_status: MaritalStatus => MaritalStatus,

    teaching_hours: WeeklyHours => TeachingHours,
    admin_hours: WeeklyHours => AdminHours,
    weekend_work: WeekendWork => WeekendWork,
    role_overload: OverloadRating => RoleOverload,
    publish_pressure: YesNo => PublishPressure,

    workspace_setup: WorkspaceSetup => WorkspaceSetup,
    screen_position: ScreenPosition => ScreenPosition,
    feet_support: YesNo => FeetSupport,
    sitting_duration: DurationBand => SittingDuration,
    most_discomfort_activity: DiscomfortActivity => MostDiscomfortActivity,

    sleep_hours: SleepDuration => SleepHours,
    physical_activity: ActivityLevel => PhysicalActivity,
    hydration: Hydration => Hydration,
    commute_time: DurationBand => CommuteTime,

    neck_pain: DiscomfortScore => NeckPain,
    lower_back_pain: DiscomfortScore => LowerBackPain,
    wrist_pain: DiscomfortScore => WristPain,
    shoulder_pain: DiscomfortScore => ShoulderPain,
    leg_pain: DiscomfortScore => LegPain,
    eye_strain: DiscomfortScore => EyeStrain,

    who5_q1: Frequency => Who5Q1,
    who5_q2: Frequency => Who5Q2,
    who5_q3: Frequency => Who5Q3,
    who5_q4: Frequency => Who5Q4,
    who5_q5: Frequency => Who5Q5,
}

impl Default for SurveyState {
    fn default() -> Self {
        Self {
            consent: YesNo::Yes,

            age_group: AgeGroup::From18To25,
            department: "Computer Science / AIML".to_string(),
            designation: Designation::Student,
            experience_years: ExperienceBand::UpTo1,
            marital_status: MaritalStatus::Single,

            teaching_hours: WeeklyHours(0),
            admin_hours: WeeklyHours(0),
            weekend_work: WeekendWork::Never,
            role_overload: OverloadRating(3),
            publish_pressure: YesNo::No,

            workspace_setup: WorkspaceSetup::BasicChairAndTable,
            screen_position: ScreenPosition::AtEyeLevel,
            feet_support: YesNo::No,
            sitting_duration: DurationBand::OneToTwoHours,
            most_discomfort_activity: DiscomfortActivity::Sitting,

            sleep_hours: SleepDuration::SixToSeven,
            physical_activity: ActivityLevel::Sedentary,
            hydration: Hydration::OneToTwoLitres,
            commute_time: DurationBand::UnderHalfHour,

            neck_pain: DiscomfortScore(0),
            lower_back_pain: DiscomfortScore(0),
            wrist_pain: DiscomfortScore(0),
            shoulder_pain: DiscomfortScore(0),
            leg_pain: DiscomfortScore(0),
            eye_strain: DiscomfortScore(0),

            who5_q1: Frequency::SomeOfTheTime,
            who5_q2: Frequency::SomeOfTheTime,
            who5_q3: Frequency::SomeOfTheTime,
            who5_q4: Frequency::SomeOfTheTime,
            who5_q5: Frequency::SomeOfTheTime,
        }
    }
}

impl FromStr for SurveyField {
    type Err = FieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        SurveyField::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name() == raw)
            .ok_or_else(|| FieldError::UnknownField(raw.to_string()))
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn default_snapshot_serializes_every_field_flat() {
        let value = serde_json::to_value(SurveyState::default()).expect("encode");
        let object = value.as_object().expect("flat object");

        assert_eq!(object.len(), SurveyField::ALL.len());
        for field in SurveyField::ALL {
            let entry = object
                .get(field.wire_name())
                .unwrap_or_else(|| panic!("missing {field}"));
            assert!(!entry.is_object() && !entry.is_array(), "{field} is nested");
        }
        assert_eq!(object["consent"], Value::from("Yes"));
        assert_eq!(object["role_overload"], Value::from(3));
        assert_eq!(object["sitting_duration"], Value::from("1 - 2 hours"));
        assert_eq!(object["who5_q3"], Value::from("Some of the time"));
    }

    #[test]
    fn update_replaces_one_field_and_leaves_the_source_untouched() {
        let before = SurveyState::default();
        let after = before.update(FieldUpdate::NeckPain(DiscomfortScore::saturating(4)));

        assert_eq!(before.neck_pain.get(), 0);
        assert_eq!(after.neck_pain.get(), 4);
        for field in SurveyField::ALL {
            if *field != SurveyField::NeckPain {
                assert_eq!(before.value_of(*field), after.value_of(*field), "{field}");
            }
        }
    }

    #[test]
    fn repeated_updates_keep_every_field_in_domain() {
        let mut state = SurveyState::default();
        let inputs = [
            ("teaching_hours", "75"),
            ("admin_hours", "-3"),
            ("role_overload", "0"),
            ("eye_strain", "9"),
            ("consent", "no"),
            ("department", "Mechanical"),
            ("who5_q5", "all of the time"),
        ];
        for (name, raw) in inputs {
            let field: SurveyField = name.parse().expect("known field");
            state = state.update(FieldUpdate::from_input(field, raw).expect("editor input"));
        }

        assert_eq!(state.teaching_hours.get(), 60);
        assert_eq!(state.admin_hours.get(), 0);
        assert_eq!(state.role_overload.get(), 1);
        assert_eq!(state.eye_strain.get(), 5);
        assert_eq!(state.consent, YesNo::No);
        assert_eq!(state.department, "Mechanical");
        assert_eq!(state.who5_q5, Frequency::AllOfTheTime);

        let decoded: SurveyState =
            serde_json::from_value(serde_json::to_value(&state).expect("encode")).expect("decode");
        assert_eq!(decoded, state);
    }

    #[test]
    fn wire_round_trip_is_lossless() {
        let state = SurveyState::default()
            .update(FieldUpdate::Consent(YesNo::No))
            .update(FieldUpdate::CommuteTime(DurationBand::OverTwoHours))
            .update(FieldUpdate::PhysicalActivity(ActivityLevel::Moderate))
            .update(FieldUpdate::TeachingHours(WeeklyHours::new(18).expect("in range")));

        let encoded = serde_json::to_string(&state).expect("encode");
        let decoded: SurveyState = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, state);
    }

    #[test]
    fn decoding_rejects_out_of_domain_values() {
        let mut value = serde_json::to_value(SurveyState::default()).expect("encode");
        value["role_overload"] = Value::from(6);
        assert!(serde_json::from_value::<SurveyState>(value).is_err());

        let mut value = serde_json::to_value(SurveyState::default()).expect("encode");
        value["screen_position"] = Value::from("Behind me");
        assert!(serde_json::from_value::<SurveyState>(value).is_err());
    }

    #[test]
    fn bounded_scores_refuse_out_of_range_construction() {
        assert!(WeeklyHours::new(61).is_err());
        assert!(OverloadRating::new(0).is_err());
        assert!(DiscomfortScore::new(-1).is_err());
        assert_eq!(DiscomfortScore::new(5).expect("in range").get(), 5);
    }

    #[test]
    fn option_editor_rejects_unlisted_values() {
        let err = FieldUpdate::from_input(SurveyField::Hydration, "a bucket").expect_err("unlisted");
        match err {
            FieldError::UnknownOption { allowed, .. } => {
                assert!(allowed.contains(&"More than 2 litres"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            FieldUpdate::from_input(SurveyField::LegPain, "three"),
            Err(FieldError::InvalidNumber { .. })
        ));
        assert!(matches!(
            "shoe_size".parse::<SurveyField>(),
            Err(FieldError::UnknownField(_))
        ));
    }

    #[test]
    fn domains_describe_editor_constraints() {
        assert_eq!(
            SurveyField::RoleOverload.domain(),
            Domain::Range { min: 1, max: 5 }
        );
        assert_eq!(SurveyField::Department.domain(), Domain::FreeText);
        match SurveyField::AgeGroup.domain() {
            Domain::Options(options) => assert_eq!(options.first(), Some(&"18-25")),
            other => panic!("unexpected domain: {other:?}"),
        }
    }
}
