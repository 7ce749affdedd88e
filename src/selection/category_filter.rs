use super::{ChannelConstraint, ChannelName};
use crate::data_types::GroupingField;
use crate::record_store::RecordStore;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Checkbox state for one groupable field.
///
/// Only the unchecked labels are tracked: a record is admitted unless its
/// label was switched off, and with nothing switched off the channel is
/// unconstrained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter {
    field: GroupingField,
    categories: Vec<String>,
    unchecked: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new(field: GroupingField, store: &RecordStore) -> Self {
        Self {
            field,
            categories: field.options(store.records()),
            unchecked: BTreeSet::new(),
        }
    }

    pub fn field(&self) -> GroupingField {
        self.field
    }

    pub fn channel(&self) -> ChannelName {
        self.field.channel()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_checked(&self, category: &str) -> bool {
        !self.unchecked.contains(category)
    }

    /// Labels with their checkbox state, in display order.
    pub fn options(&self) -> Vec<(String, bool)> {
        self.categories
            .iter()
            .map(|c| (c.clone(), self.is_checked(c)))
            .collect()
    }

    /// Flips one checkbox and returns the channel's new constraint.
    ///
    /// Unknown labels leave the filter untouched.
    pub fn toggle(&mut self, category: &str, checked: bool, store: &RecordStore) -> ChannelConstraint {
        if !self.categories.iter().any(|c| c == category) {
            warn!(field = self.field.name(), category, "ignoring unknown category");
            return self.constraint(store);
        }
        if checked {
            self.unchecked.remove(category);
        } else {
            self.unchecked.insert(category.to_string());
        }
        debug!(
            field = self.field.name(),
            category,
            checked,
            unchecked = self.unchecked.len(),
            "category filter toggled"
        );
        self.constraint(store)
    }

    pub fn constraint(&self, store: &RecordStore) -> ChannelConstraint {
        if self.unchecked.is_empty() {
            return ChannelConstraint::Unconstrained;
        }
        let field = self.field;
        ChannelConstraint::Only(
            store.ids_where(|r| !self.unchecked.contains(field.category_of(r))),
        )
    }
}
