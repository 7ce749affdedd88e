use super::{ChannelConstraint, CombinedSelection};
use crate::data_types::RecordId;
use std::collections::HashSet;
use std::sync::Arc;

/// Intersects every constrained channel. With no constrained channel the
/// result is the full id set.
///
/// Only the smallest set is scanned; the others are probed by hash.
pub fn combine<'a, I>(all_ids: &Arc<HashSet<RecordId>>, channels: I) -> CombinedSelection
where
    I: IntoIterator<Item = &'a ChannelConstraint>,
{
    let mut sets: Vec<&HashSet<RecordId>> = channels
        .into_iter()
        .filter_map(ChannelConstraint::ids)
        .collect();

    sets.sort_by_key(|s| s.len());
    let Some((smallest, rest)) = sets.split_first() else {
        return CombinedSelection::all(all_ids.clone());
    };

    let ids: HashSet<RecordId> = smallest
        .iter()
        .copied()
        .filter(|id| rest.iter().all(|s| s.contains(id)))
        .collect();

    CombinedSelection::constrained(ids)
}
