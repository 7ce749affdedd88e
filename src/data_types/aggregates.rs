use super::record::RecordId;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Discretized bucket of a field value.
///
/// Numeric keys order before labels; labels order lexicographically.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum BinKey {
    Value(f64),
    Label(String),
}

impl BinKey {
    pub fn as_value(&self) -> Option<f64> {
        match self {
            BinKey::Value(v) => Some(*v),
            BinKey::Label(_) => None,
        }
    }

    // -0.0 and 0.0 land in the same bin
    fn normalized(v: f64) -> f64 {
        if v == 0.0 {
            0.0
        } else {
            v
        }
    }
}

impl PartialEq for BinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BinKey {}

impl PartialOrd for BinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (BinKey::Value(a), BinKey::Value(b)) => {
                Self::normalized(*a).total_cmp(&Self::normalized(*b))
            }
            (BinKey::Value(_), BinKey::Label(_)) => Ordering::Less,
            (BinKey::Label(_), BinKey::Value(_)) => Ordering::Greater,
            (BinKey::Label(a), BinKey::Label(b)) => a.cmp(b),
        }
    }
}

impl Hash for BinKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            BinKey::Value(v) => {
                0u8.hash(state);
                Self::normalized(*v).to_bits().hash(state);
            }
            BinKey::Label(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinKey::Value(v) => write!(f, "{}", v),
            BinKey::Label(s) => f.write_str(s),
        }
    }
}

/// Population of one category inside a bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Records admitted by the category checkboxes.
    pub count: usize,
    /// Subset of `count` also inside the combined selection.
    pub selected_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bin {
    pub key: BinKey,
    /// One entry per category, zero-filled.
    pub per_category: BTreeMap<String, CategoryCount>,
}

impl Bin {
    pub fn get(&self, category: &str) -> CategoryCount {
        self.per_category.get(category).copied().unwrap_or_default()
    }

    pub fn total_count(&self) -> usize {
        self.per_category.values().map(|c| c.count).sum()
    }

    pub fn total_selected(&self) -> usize {
        self.per_category.values().map(|c| c.selected_count).sum()
    }
}

/// Output of the binning engine for one histogram.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// Stacking order.
    pub categories: Vec<String>,
    /// Sorted ascending by key.
    pub bins: Vec<Bin>,
}

impl Aggregation {
    /// Looks up a bin. A key with no bin reads as all-zero rather than failing.
    pub fn bin(&self, key: &BinKey) -> Option<&Bin> {
        self.bins
            .binary_search_by(|b| b.key.cmp(key))
            .ok()
            .map(|i| &self.bins[i])
    }

    pub fn count(&self, key: &BinKey, category: &str) -> CategoryCount {
        self.bin(key).map(|b| b.get(category)).unwrap_or_default()
    }

    pub fn total_selected(&self) -> usize {
        self.bins.iter().map(Bin::total_selected).sum()
    }

    pub fn total_count(&self) -> usize {
        self.bins.iter().map(Bin::total_count).sum()
    }
}

/// One (x, y) cell of the bubble grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleCell {
    pub x: i64,
    pub y: i64,
    pub count: usize,
    pub selected_count: usize,
    /// Mean of the colour field over the cell's records, 0 when empty.
    pub avg_value: f64,
    pub ids: Vec<RecordId>,
}
