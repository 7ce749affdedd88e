// Linked chart widgets

pub mod bubble_grid;
pub mod histogram;
pub mod scatter;
pub mod tooltip;

pub use bubble_grid::BubbleGrid;
pub use histogram::Histogram;
pub use scatter::ScatterPlot;
pub use tooltip::Tooltip;

use crate::data_types::{RecordId, Scene};
use crate::selection::{ChannelConstraint, ChannelName, SelectionState, SelectionUpdate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A user-drawn selection area in plot-area pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrushRegion {
    /// Horizontal extent only, spanning the full plot height.
    XRange { x0: f32, x1: f32 },
    Rect { x0: f32, y0: f32, x1: f32, y1: f32 },
}

impl BrushRegion {
    pub fn x_range(a: f32, b: f32) -> Self {
        Self::XRange {
            x0: a.min(b),
            x1: a.max(b),
        }
    }

    pub fn rect(a: (f32, f32), b: (f32, f32)) -> Self {
        Self::Rect {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// A zero-area drag, which clears the brush.
    pub fn is_empty(&self) -> bool {
        match *self {
            Self::XRange { x0, x1 } => !(x1 > x0),
            Self::Rect { x0, y0, x1, y1 } => !(x1 > x0) || !(y1 > y0),
        }
    }

    pub fn contains_x(&self, px: f32) -> bool {
        match *self {
            Self::XRange { x0, x1 } | Self::Rect { x0, x1, .. } => px >= x0 && px <= x1,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        match *self {
            Self::XRange { .. } => self.contains_x(px),
            Self::Rect { y0, y1, .. } => self.contains_x(px) && py >= y0 && py <= y1,
        }
    }
}

/// Brush lifecycle of a widget. Grouping changes do not touch it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BrushState {
    #[default]
    Unbrushed,
    Brushed(BrushRegion),
}

/// Shared contract of the histogram, scatter plot and bubble grid.
///
/// A widget never writes to the selection state itself: `handle_brush` returns
/// the update for the owner to apply, and `apply_selection` only reads.
pub trait LinkedView: Send + Sync {
    fn mount(&self) -> &str;

    /// Channel this widget's brush writes to.
    fn channel(&self) -> &ChannelName;

    fn brush_state(&self) -> BrushState;

    fn set_brush_state(&mut self, state: BrushState);

    /// Records whose rendered position falls inside `region`.
    fn hit_test(&self, region: &BrushRegion) -> HashSet<RecordId>;

    /// Re-derives aggregates and mark styles from the current selection.
    fn apply_selection(&mut self, selection: &SelectionState);

    /// Rebuilds the scene from the current aggregates. Idempotent.
    fn render(&mut self);

    fn scene(&self) -> Scene;

    /// Hover content for mark `index`; de-emphasized marks yield nothing.
    fn tooltip(&self, index: usize) -> Option<Tooltip>;

    /// Translates a finished brush gesture into a channel update.
    ///
    /// A cleared region, a zero-area drag or a region covering no records
    /// leaves the channel unconstrained.
    fn handle_brush(&mut self, region: Option<BrushRegion>) -> SelectionUpdate {
        let hit = region
            .filter(|r| !r.is_empty())
            .map(|r| (r, self.hit_test(&r)))
            .filter(|(_, ids)| !ids.is_empty());

        let constraint = match hit {
            Some((r, ids)) => {
                self.set_brush_state(BrushState::Brushed(r));
                ChannelConstraint::Only(ids)
            }
            None => {
                self.set_brush_state(BrushState::Unbrushed);
                ChannelConstraint::Unconstrained
            }
        };

        debug!(
            mount = self.mount(),
            channel = %self.channel(),
            selected = constraint.ids().map(HashSet::len),
            "brush finished"
        );
        SelectionUpdate::single(self.channel().clone(), constraint)
    }
}
