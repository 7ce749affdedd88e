use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a record, assigned from its ordinal row position at load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u32);

impl RecordId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a field holds numbers or labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// The closed set of dataset columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "Age")]
    Age,
    #[serde(rename = "Daily_Screen_Time")]
    DailyScreenTime,
    #[serde(rename = "Sleep_Quality")]
    SleepQuality,
    #[serde(rename = "Stress_Level")]
    StressLevel,
    #[serde(rename = "Days_Without_Social_Media")]
    DaysWithoutSocialMedia,
    #[serde(rename = "Exercise_Frequency")]
    ExerciseFrequency,
    #[serde(rename = "Happiness_Index")]
    HappinessIndex,
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Social_Media_Platform")]
    SocialMediaPlatform,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Age,
        Field::DailyScreenTime,
        Field::SleepQuality,
        Field::StressLevel,
        Field::DaysWithoutSocialMedia,
        Field::ExerciseFrequency,
        Field::HappinessIndex,
        Field::Gender,
        Field::SocialMediaPlatform,
    ];

    /// Column header as it appears in the dataset.
    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::DailyScreenTime => "Daily_Screen_Time",
            Field::SleepQuality => "Sleep_Quality",
            Field::StressLevel => "Stress_Level",
            Field::DaysWithoutSocialMedia => "Days_Without_Social_Media",
            Field::ExerciseFrequency => "Exercise_Frequency",
            Field::HappinessIndex => "Happiness_Index",
            Field::Gender => "Gender",
            Field::SocialMediaPlatform => "Social_Media_Platform",
        }
    }

    /// Header with underscores turned into spaces, used for titles and tooltips.
    pub fn label(self) -> String {
        self.name().replace('_', " ")
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Gender | Field::SocialMediaPlatform => FieldKind::Categorical,
            _ => FieldKind::Numeric,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == FieldKind::Numeric
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A borrowed field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Label(&'a str),
}

impl FieldValue<'_> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Label(s) => Some(s),
        }
    }
}

/// One survey row. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub age: f64,
    pub daily_screen_time: f64,
    pub sleep_quality: f64,
    pub stress_level: f64,
    pub days_without_social_media: f64,
    pub exercise_frequency: f64,
    pub happiness_index: f64,
    pub gender: String,
    pub social_media_platform: String,
}

impl Record {
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Age => FieldValue::Number(self.age),
            Field::DailyScreenTime => FieldValue::Number(self.daily_screen_time),
            Field::SleepQuality => FieldValue::Number(self.sleep_quality),
            Field::StressLevel => FieldValue::Number(self.stress_level),
            Field::DaysWithoutSocialMedia => FieldValue::Number(self.days_without_social_media),
            Field::ExerciseFrequency => FieldValue::Number(self.exercise_frequency),
            Field::HappinessIndex => FieldValue::Number(self.happiness_index),
            Field::Gender => FieldValue::Label(&self.gender),
            Field::SocialMediaPlatform => FieldValue::Label(&self.social_media_platform),
        }
    }

    /// Numeric value of `field`, `None` for categorical fields.
    pub fn number(&self, field: Field) -> Option<f64> {
        self.value(field).as_number()
    }

    /// Label of a categorical field, `None` for numeric fields.
    pub fn label(&self, field: Field) -> Option<&str> {
        match self.value(field) {
            FieldValue::Label(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}
