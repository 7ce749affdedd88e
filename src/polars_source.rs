#![cfg(feature = "polars")]

//! Dataset loading through polars.

use crate::data_types::{Field, Record, RecordId};
use crate::record_store::RecordStore;
use eyre::{eyre, Result, WrapErr};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

fn numeric_column(df: &DataFrame, field: Field) -> Result<Vec<f64>> {
    let series = df
        .column(field.name())
        .wrap_err_with(|| format!("missing column '{}'", field.name()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .wrap_err_with(|| format!("column '{}' is not numeric", field.name()))?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| eyre!("row {}: missing value for '{}'", row, field.name())))
        .collect()
}

fn label_column(df: &DataFrame, field: Field) -> Result<Vec<String>> {
    let series = df
        .column(field.name())
        .wrap_err_with(|| format!("missing column '{}'", field.name()))?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().trim().to_string())
        .collect())
}

impl RecordStore {
    /// Builds a store from a frame holding one column per [`Field`].
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let age = numeric_column(df, Field::Age)?;
        let screen = numeric_column(df, Field::DailyScreenTime)?;
        let sleep = numeric_column(df, Field::SleepQuality)?;
        let stress = numeric_column(df, Field::StressLevel)?;
        let days_off = numeric_column(df, Field::DaysWithoutSocialMedia)?;
        let exercise = numeric_column(df, Field::ExerciseFrequency)?;
        let happiness = numeric_column(df, Field::HappinessIndex)?;
        let gender = label_column(df, Field::Gender)?;
        let platform = label_column(df, Field::SocialMediaPlatform)?;

        let records = (0..df.height())
            .map(|i| Record {
                id: RecordId(i as u32),
                age: age[i],
                daily_screen_time: screen[i],
                sleep_quality: sleep[i],
                stress_level: stress[i],
                days_without_social_media: days_off[i],
                exercise_frequency: exercise[i],
                happiness_index: happiness[i],
                gender: gender[i].clone(),
                social_media_platform: platform[i].clone(),
            })
            .collect();

        Ok(Self::new(records))
    }
}

/// Reads a header-named CSV file into a [`RecordStore`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<RecordStore> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .wrap_err_with(|| format!("cannot open {}", path.display()))?
        .finish()
        .wrap_err_with(|| format!("cannot parse {}", path.display()))?;
    let store = RecordStore::from_dataframe(&df)?;
    info!(path = %path.display(), records = store.len(), "dataset loaded");
    Ok(store)
}
