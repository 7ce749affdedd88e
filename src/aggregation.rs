//! Binning / aggregation engine.
//!
//! Pure functions from (records, field, bin width, grouping, predicates) to the
//! per-bin and per-cell counts the widgets draw. Nothing here is incremental:
//! every call recomputes from the full record slice.

use crate::data_types::{
    Aggregation, Bin, BinKey, BubbleCell, CategoryCount, Field, FieldValue, Grouping, Record,
    ALL_CATEGORY,
};
use crate::selection::{ChannelConstraint, CombinedSelection};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Rounds `value` to the nearest multiple of `bin_width`; halves round up.
pub fn interval_key(value: f64, bin_width: f64) -> f64 {
    if bin_width <= 0.0 || !bin_width.is_finite() {
        return value;
    }
    (value / bin_width + 0.5).floor() * bin_width
}

/// How one histogram discretizes its field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binning {
    pub field: Field,
    pub bin_width: f64,
    pub is_interval: bool,
}

impl Binning {
    pub fn new(field: Field, bin_width: f64, is_interval: bool) -> Self {
        Self {
            field,
            bin_width,
            is_interval,
        }
    }

    pub fn key(&self, record: &Record) -> BinKey {
        match record.value(self.field) {
            FieldValue::Number(v) if self.is_interval => BinKey::Value(interval_key(v, self.bin_width)),
            FieldValue::Number(v) => BinKey::Value(v),
            FieldValue::Label(s) => BinKey::Label(s.to_string()),
        }
    }

    /// Every key present in the unfiltered dataset, ascending.
    ///
    /// Computed once per widget so bins that a filter empties stay on the axis.
    pub fn all_keys(&self, records: &[Record]) -> Vec<BinKey> {
        let keys: BTreeSet<BinKey> = records.par_iter().map(|r| self.key(r)).collect();
        keys.into_iter().collect()
    }
}

/// Counts each bin per category.
///
/// `count` covers records admitted by `category_filter` (only consulted when a
/// grouping field is active); `selected_count` additionally requires membership
/// in `combined`. Every bin in `keys` gets an explicit entry for every category.
pub fn aggregate(
    records: &[Record],
    binning: &Binning,
    keys: &[BinKey],
    grouping: Grouping,
    category_filter: &ChannelConstraint,
    combined: &CombinedSelection,
) -> Aggregation {
    let categories = grouping.categories(records);
    let empty_row: BTreeMap<String, CategoryCount> = categories
        .iter()
        .map(|c| (c.clone(), CategoryCount::default()))
        .collect();

    let mut rows: HashMap<BinKey, BTreeMap<String, CategoryCount>> =
        keys.iter().map(|k| (k.clone(), empty_row.clone())).collect();

    for record in records {
        let category = match grouping.field() {
            None => ALL_CATEGORY,
            Some(g) => {
                if !category_filter.admits(record.id) {
                    continue;
                }
                g.category_of(record)
            }
        };
        let Some(row) = rows.get_mut(&binning.key(record)) else {
            continue;
        };
        // labels outside the known set are not stacked
        let Some(entry) = row.get_mut(category) else {
            continue;
        };
        entry.count += 1;
        if combined.contains(record.id) {
            entry.selected_count += 1;
        }
    }

    let bins = keys
        .iter()
        .map(|key| Bin {
            key: key.clone(),
            per_category: rows.remove(key).unwrap_or_else(|| empty_row.clone()),
        })
        .collect();

    Aggregation { categories, bins }
}

/// Mean of `values`, 0 when there are none.
pub fn mean_or_zero(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Groups records by the integer values of two fields, one cell per observed pair.
pub fn aggregate_bubbles(
    records: &[Record],
    x_field: Field,
    y_field: Field,
    color_field: Field,
    combined: &CombinedSelection,
) -> Vec<BubbleCell> {
    let mut cells: BTreeMap<(i64, i64), Vec<&Record>> = BTreeMap::new();
    for record in records {
        let (Some(x), Some(y)) = (record.number(x_field), record.number(y_field)) else {
            continue;
        };
        if x.is_nan() || y.is_nan() {
            continue;
        }
        cells
            .entry((x.round() as i64, y.round() as i64))
            .or_default()
            .push(record);
    }

    cells
        .into_iter()
        .map(|((x, y), members)| BubbleCell {
            x,
            y,
            count: members.len(),
            selected_count: members.iter().filter(|r| combined.contains(r.id)).count(),
            avg_value: mean_or_zero(members.iter().filter_map(|r| r.number(color_field))),
            ids: members.iter().map(|r| r.id).collect(),
        })
        .collect()
}
