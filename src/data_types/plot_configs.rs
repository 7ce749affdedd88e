use super::grouping::GroupingField;
use super::record::Field;
use crate::widgets::bubble_grid::BUBBLE_CHANNEL;
use crate::widgets::scatter::SCATTER_CHANNEL;
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub mount: String,
    pub field: Field,
    pub bin_width: f64,
    /// Round values into `bin_width` buckets instead of using them raw.
    #[serde(default)]
    pub is_interval: bool,
}

impl HistogramConfig {
    pub fn new(mount: &str, field: Field, bin_width: f64, is_interval: bool) -> Self {
        Self {
            mount: mount.to_string(),
            field,
            bin_width,
            is_interval,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub mount: String,
    pub x_field: Field,
    pub y_field: Field,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            mount: "scatter".to_string(),
            x_field: Field::DailyScreenTime,
            y_field: Field::SleepQuality,
            x_domain: (0.0, 11.0),
            y_domain: (1.0, 10.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub mount: String,
    pub x_field: Field,
    pub y_field: Field,
    /// Band domain of the x axis.
    pub x_values: Vec<i64>,
    pub y_values: Vec<i64>,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            mount: "bubble".to_string(),
            x_field: Field::ExerciseFrequency,
            y_field: Field::DaysWithoutSocialMedia,
            x_values: (0..=7).collect(),
            y_values: (0..=9).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub histograms: Vec<HistogramConfig>,
    pub scatter: ScatterConfig,
    pub bubble: BubbleConfig,
    /// Field driving scatter and bubble colours.
    pub color_field: Field,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histograms: vec![
                HistogramConfig::new("bar1", Field::Age, 5.0, true),
                HistogramConfig::new("bar2", Field::DailyScreenTime, 1.0, true),
                HistogramConfig::new("bar3", Field::SleepQuality, 1.0, false),
                HistogramConfig::new("bar4", Field::StressLevel, 1.0, false),
                HistogramConfig::new("bar5", Field::DaysWithoutSocialMedia, 1.0, false),
                HistogramConfig::new("bar6", Field::ExerciseFrequency, 1.0, false),
                HistogramConfig::new("bar7", Field::HappinessIndex, 1.0, false),
            ],
            scatter: ScatterConfig::default(),
            bubble: BubbleConfig::default(),
            color_field: Field::StressLevel,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).wrap_err("failed to parse dashboard configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize dashboard configuration")
    }

    pub fn validate(&self) -> Result<()> {
        let mut mounts = HashSet::new();
        let all_mounts = self
            .histograms
            .iter()
            .map(|h| h.mount.as_str())
            .chain([self.scatter.mount.as_str(), self.bubble.mount.as_str()]);
        for mount in all_mounts {
            if !mounts.insert(mount) {
                return Err(eyre!("mount '{}' is used by more than one widget", mount));
            }
        }
        for h in &self.histograms {
            // histogram brushes write to the channel named after the mount
            let taken = [SCATTER_CHANNEL, BUBBLE_CHANNEL]
                .into_iter()
                .chain(GroupingField::ALL.iter().map(|g| g.name()))
                .any(|name| name == h.mount);
            if taken {
                return Err(eyre!(
                    "histogram mount '{}' clashes with another widget's channel",
                    h.mount
                ));
            }
            if !(h.bin_width > 0.0 && h.bin_width.is_finite()) {
                return Err(eyre!(
                    "histogram '{}' has invalid bin width {}",
                    h.mount,
                    h.bin_width
                ));
            }
            if h.is_interval && !h.field.is_numeric() {
                return Err(eyre!(
                    "histogram '{}' cannot bin categorical field {} into intervals",
                    h.mount,
                    h.field
                ));
            }
        }
        for (name, field) in [
            ("scatter x", self.scatter.x_field),
            ("scatter y", self.scatter.y_field),
            ("bubble x", self.bubble.x_field),
            ("bubble y", self.bubble.y_field),
            ("colour", self.color_field),
        ] {
            if !field.is_numeric() {
                return Err(eyre!("{} field {} must be numeric", name, field));
            }
        }
        Ok(())
    }
}
