//! Selection State
//!
//! The only shared mutable state of a dashboard: one constraint per named
//! channel and the combined selection derived from them. Channels are written
//! exclusively through [`SelectionState::update_channel`] (or a batched
//! [`SelectionUpdate`]); every write recombines synchronously, so a reader can
//! never observe a combined set that lags behind the channels.

pub mod category_filter;
pub mod combinator;

pub use category_filter::CategoryFilter;
pub use combinator::combine;

use crate::data_types::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of a filter channel, e.g. a brushable widget or a groupable field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a single channel admits.
///
/// `Unconstrained` imposes nothing; `Only` with an empty set admits nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChannelConstraint {
    #[default]
    Unconstrained,
    Only(HashSet<RecordId>),
}

impl ChannelConstraint {
    pub fn from_ids(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self::Only(ids.into_iter().collect())
    }

    pub fn ids(&self) -> Option<&HashSet<RecordId>> {
        match self {
            Self::Unconstrained => None,
            Self::Only(ids) => Some(ids),
        }
    }

    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::Only(_))
    }

    pub fn admits(&self, id: RecordId) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

/// Intersection of all constrained channels, shared cheaply with every widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedSelection {
    ids: Arc<HashSet<RecordId>>,
    unconstrained: bool,
}

impl CombinedSelection {
    pub fn all(all_ids: Arc<HashSet<RecordId>>) -> Self {
        Self {
            ids: all_ids,
            unconstrained: true,
        }
    }

    pub fn constrained(ids: HashSet<RecordId>) -> Self {
        Self {
            ids: Arc::new(ids),
            unconstrained: false,
        }
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &Arc<HashSet<RecordId>> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when no channel restricts the selection.
    pub fn is_unconstrained(&self) -> bool {
        self.unconstrained
    }
}

/// A partial mapping of channel name to new constraint, applied as one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionUpdate {
    changes: BTreeMap<ChannelName, ChannelConstraint>,
}

impl SelectionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(channel: ChannelName, constraint: ChannelConstraint) -> Self {
        Self::new().set(channel, constraint)
    }

    pub fn clear(channel: ChannelName) -> Self {
        Self::single(channel, ChannelConstraint::Unconstrained)
    }

    pub fn set(mut self, channel: ChannelName, constraint: ChannelConstraint) -> Self {
        self.changes.insert(channel, constraint);
        self
    }

    pub fn get(&self, channel: &ChannelName) -> Option<&ChannelConstraint> {
        self.changes.get(channel)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelName, &ChannelConstraint)> {
        self.changes.iter()
    }
}

impl IntoIterator for SelectionUpdate {
    type Item = (ChannelName, ChannelConstraint);
    type IntoIter = std::collections::btree_map::IntoIter<ChannelName, ChannelConstraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

#[derive(Clone, Debug)]
pub struct SelectionState {
    all_ids: Arc<HashSet<RecordId>>,
    channels: BTreeMap<ChannelName, ChannelConstraint>,
    combined: CombinedSelection,
}

impl SelectionState {
    pub fn new(all_ids: Arc<HashSet<RecordId>>) -> Self {
        Self {
            combined: CombinedSelection::all(all_ids.clone()),
            all_ids,
            channels: BTreeMap::new(),
        }
    }

    /// Creates `name` as an unconstrained channel. Existing channels are left alone.
    pub fn register_channel(&mut self, name: ChannelName) {
        self.channels.entry(name).or_default();
    }

    /// Sets one channel and recombines.
    pub fn update_channel(
        &mut self,
        name: ChannelName,
        constraint: ChannelConstraint,
    ) -> &CombinedSelection {
        self.store(name, constraint);
        self.recombine();
        &self.combined
    }

    /// Sets every channel named in `update`, then recombines once.
    pub fn update_channels(&mut self, update: SelectionUpdate) -> &CombinedSelection {
        for (name, constraint) in update {
            self.store(name, constraint);
        }
        self.recombine();
        &self.combined
    }

    /// Constraint of `name`; unknown channels read as unconstrained.
    pub fn channel(&self, name: &ChannelName) -> &ChannelConstraint {
        const UNCONSTRAINED: &ChannelConstraint = &ChannelConstraint::Unconstrained;
        self.channels.get(name).unwrap_or(UNCONSTRAINED)
    }

    pub fn has_channel(&self, name: &ChannelName) -> bool {
        self.channels.contains_key(name)
    }

    pub fn channels(&self) -> impl Iterator<Item = (&ChannelName, &ChannelConstraint)> {
        self.channels.iter()
    }

    pub fn combined(&self) -> &CombinedSelection {
        &self.combined
    }

    pub fn all_ids(&self) -> &Arc<HashSet<RecordId>> {
        &self.all_ids
    }

    fn store(&mut self, name: ChannelName, mut constraint: ChannelConstraint) {
        if let ChannelConstraint::Only(ids) = &mut constraint {
            let before = ids.len();
            ids.retain(|id| self.all_ids.contains(id));
            if ids.len() != before {
                warn!(
                    channel = %name,
                    dropped = before - ids.len(),
                    "ignoring ids unknown to the record store"
                );
            }
        }
        if !self.channels.contains_key(&name) {
            debug!(channel = %name, "registering channel on first write");
        }
        self.channels.insert(name, constraint);
    }

    fn recombine(&mut self) {
        self.combined = combine(&self.all_ids, self.channels.values());
        debug!(
            constrained = self.channels.values().filter(|c| c.is_constrained()).count(),
            combined = self.combined.len(),
            "selection recombined"
        );
    }
}
