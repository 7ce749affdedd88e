use super::record::{Field, Record};
use crate::selection::ChannelName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Label of the synthetic category used when nothing is grouped.
pub const ALL_CATEGORY: &str = "All";

pub const GENDER_CATEGORIES: [&str; 3] = ["Male", "Female", "Other"];

/// Categorical fields a histogram can be stacked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupingField {
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Social_Media_Platform")]
    SocialMediaPlatform,
}

impl GroupingField {
    pub const ALL: [GroupingField; 2] = [GroupingField::Gender, GroupingField::SocialMediaPlatform];

    pub fn field(self) -> Field {
        match self {
            GroupingField::Gender => Field::Gender,
            GroupingField::SocialMediaPlatform => Field::SocialMediaPlatform,
        }
    }

    pub fn from_field(field: Field) -> Option<Self> {
        match field {
            Field::Gender => Some(GroupingField::Gender),
            Field::SocialMediaPlatform => Some(GroupingField::SocialMediaPlatform),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.field().name()
    }

    /// Channel written by this field's category checkboxes.
    pub fn channel(self) -> ChannelName {
        ChannelName::new(self.name())
    }

    /// Known labels for this field.
    ///
    /// Gender is a fixed enumeration; platforms are whatever the dataset contains,
    /// sorted so the stacking order is stable.
    pub fn categories(self, records: &[Record]) -> Vec<String> {
        match self {
            GroupingField::Gender => GENDER_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            GroupingField::SocialMediaPlatform => records
                .iter()
                .map(|r| r.social_media_platform.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Checkbox labels: the known categories, then any other label the data
    /// holds in sorted order.
    pub fn options(self, records: &[Record]) -> Vec<String> {
        let mut labels = self.categories(records);
        let extra: BTreeSet<&str> = records
            .iter()
            .map(|r| self.category_of(r))
            .filter(|label| !labels.iter().any(|known| known == *label))
            .collect();
        labels.extend(extra.into_iter().map(str::to_string));
        labels
    }

    /// Category label of `record` for this field.
    pub fn category_of(self, record: &Record) -> &str {
        match self {
            GroupingField::Gender => &record.gender,
            GroupingField::SocialMediaPlatform => &record.social_media_platform,
        }
    }
}

/// Active stacking of the histograms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grouping {
    #[default]
    All,
    By(GroupingField),
}

impl Grouping {
    /// Resolves a selector value. The empty string means no grouping; unknown
    /// names fall back to [`Grouping::All`].
    pub fn parse(name: &str) -> Self {
        if name.is_empty() {
            return Grouping::All;
        }
        match Field::from_name(name).and_then(GroupingField::from_field) {
            Some(g) => Grouping::By(g),
            None => {
                warn!(grouping = name, "unknown grouping field, falling back to a single category");
                Grouping::All
            }
        }
    }

    pub fn field(self) -> Option<GroupingField> {
        match self {
            Grouping::All => None,
            Grouping::By(g) => Some(g),
        }
    }

    pub fn categories(self, records: &[Record]) -> Vec<String> {
        match self {
            Grouping::All => vec![ALL_CATEGORY.to_string()],
            Grouping::By(g) => g.categories(records),
        }
    }
}
