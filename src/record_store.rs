//! Record Store
//!
//! The immutable, loaded dataset. Records are numbered by their row position
//! at load time and that id is the only handle the rest of the crate uses.

use crate::data_types::{Field, FieldKind, Record, RecordId};
use eyre::{eyre, Result, WrapErr};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    all_ids: Arc<HashSet<RecordId>>,
}

impl RecordStore {
    /// Builds a store, renumbering ids from the ordinal position of each record.
    pub fn new(mut records: Vec<Record>) -> Self {
        for (i, r) in records.iter_mut().enumerate() {
            r.id = RecordId(i as u32);
        }
        let all_ids = Arc::new(records.iter().map(|r| r.id).collect());
        Self { records, all_ids }
    }

    /// Loads header-named text rows, coercing numeric columns.
    ///
    /// Extra columns are ignored; every [`Field`] must be present.
    pub fn from_rows<H, R, C>(headers: &[H], rows: R) -> Result<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<C>>,
        C: AsRef<str>,
    {
        let mut columns = [0usize; Field::ALL.len()];
        for (slot, field) in columns.iter_mut().zip(Field::ALL) {
            *slot = headers
                .iter()
                .position(|h| h.as_ref().trim() == field.name())
                .ok_or_else(|| eyre!("missing column '{}'", field.name()))?;
        }

        let mut records = Vec::new();
        for (row_idx, row) in rows.into_iter().enumerate() {
            let cell = |field: Field| {
                let col = columns[field as usize];
                row.get(col)
                    .map(|c| c.as_ref().trim())
                    .ok_or_else(|| eyre!("row {} has no value for '{}'", row_idx, field.name()))
            };
            let number = |field: Field| -> Result<f64> {
                debug_assert_eq!(field.kind(), FieldKind::Numeric);
                let raw = cell(field)?;
                raw.parse::<f64>()
                    .wrap_err_with(|| format!("row {}: '{}' is not a number for '{}'", row_idx, raw, field.name()))
            };

            records.push(Record {
                id: RecordId(row_idx as u32),
                age: number(Field::Age)?,
                daily_screen_time: number(Field::DailyScreenTime)?,
                sleep_quality: number(Field::SleepQuality)?,
                stress_level: number(Field::StressLevel)?,
                days_without_social_media: number(Field::DaysWithoutSocialMedia)?,
                exercise_frequency: number(Field::ExerciseFrequency)?,
                happiness_index: number(Field::HappinessIndex)?,
                gender: cell(Field::Gender)?.to_string(),
                social_media_platform: cell(Field::SocialMediaPlatform)?.to_string(),
            });
        }

        info!(records = records.len(), "dataset loaded");
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    pub fn all_ids(&self) -> &Arc<HashSet<RecordId>> {
        &self.all_ids
    }

    pub fn contains(&self, id: RecordId) -> bool {
        id.index() < self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of records matching `pred`.
    pub fn ids_where(&self, mut pred: impl FnMut(&Record) -> bool) -> HashSet<RecordId> {
        self.records
            .iter()
            .filter(|r| pred(r))
            .map(|r| r.id)
            .collect()
    }
}
