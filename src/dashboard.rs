//! Dashboard
//!
//! Owns the record store, the selection state and every widget, and is the
//! single place where channel updates are applied. Each event handler runs
//! three phases in order: a widget computes a channel value, the selection
//! state recombines, and the read-only state is broadcast to every widget.
//! Widgets never see the selection state mutably, so a broadcast cannot
//! trigger another update.

use crate::data_types::{DashboardConfig, Field, Grouping, GroupingField};
use crate::record_store::RecordStore;
use crate::rendering::SceneRenderer;
use crate::selection::{
    CategoryFilter, ChannelConstraint, ChannelName, CombinedSelection, SelectionState,
    SelectionUpdate,
};
use crate::widgets::{BrushRegion, BubbleGrid, Histogram, LinkedView, ScatterPlot};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handle for hosts dispatching events from several threads. Holding the
/// write lock for a whole handler keeps update, recombination and broadcast
/// one atomic step.
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

pub struct Dashboard {
    store: Arc<RecordStore>,
    config: DashboardConfig,
    selection: SelectionState,
    histograms: Vec<Histogram>,
    scatter: ScatterPlot,
    bubble: BubbleGrid,
    category_filters: BTreeMap<GroupingField, CategoryFilter>,
    grouping: Grouping,
}

impl Dashboard {
    pub fn new(store: RecordStore, config: DashboardConfig) -> Self {
        let store = Arc::new(store);
        let mut selection = SelectionState::new(store.all_ids().clone());

        let category_filters: BTreeMap<_, _> = GroupingField::ALL
            .into_iter()
            .map(|g| (g, CategoryFilter::new(g, &store)))
            .collect();
        for filter in category_filters.values() {
            selection.register_channel(filter.channel());
        }

        let histograms: Vec<Histogram> = config
            .histograms
            .iter()
            .map(|h| Histogram::new(store.clone(), h, &selection))
            .collect();
        let scatter = ScatterPlot::new(store.clone(), &config.scatter, config.color_field, &selection);
        let bubble = BubbleGrid::new(store.clone(), &config.bubble, config.color_field, &selection);

        for h in &histograms {
            selection.register_channel(h.channel().clone());
        }
        selection.register_channel(scatter.channel().clone());
        selection.register_channel(bubble.channel().clone());

        info!(
            records = store.len(),
            histograms = histograms.len(),
            channels = selection.channels().count(),
            "dashboard initialised"
        );

        Self {
            store,
            config,
            selection,
            histograms,
            scatter,
            bubble,
            category_filters,
            grouping: Grouping::All,
        }
    }

    pub fn with_defaults(store: RecordStore) -> Self {
        Self::new(store, DashboardConfig::default())
    }

    pub fn into_shared(self) -> SharedDashboard {
        Arc::new(RwLock::new(self))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn combined(&self) -> &CombinedSelection {
        self.selection.combined()
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    pub fn histogram(&self, mount: &str) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.mount() == mount)
    }

    /// Histogram of `field`, the first one if several share it.
    pub fn histogram_for(&self, field: Field) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.binning().field == field)
    }

    pub fn scatter(&self) -> &ScatterPlot {
        &self.scatter
    }

    pub fn bubble(&self) -> &BubbleGrid {
        &self.bubble
    }

    /// Applies a partial channel mapping, recombines and broadcasts.
    pub fn select(&mut self, update: SelectionUpdate) -> &CombinedSelection {
        if update.is_empty() {
            return self.selection.combined();
        }
        for (name, constraint) in update.iter() {
            debug!(channel = %name, constrained = constraint.is_constrained(), "channel update");
        }
        self.selection.update_channels(update);
        self.broadcast();
        self.selection.combined()
    }

    pub fn update_channel(
        &mut self,
        name: ChannelName,
        constraint: ChannelConstraint,
    ) -> &CombinedSelection {
        self.select(SelectionUpdate::single(name, constraint))
    }

    fn broadcast(&mut self) {
        let selection = &self.selection;
        for h in &mut self.histograms {
            h.apply_selection(selection);
        }
        self.scatter.apply_selection(selection);
        self.bubble.apply_selection(selection);
    }

    fn widget_mut(&mut self, mount: &str) -> Option<&mut dyn LinkedView> {
        if self.scatter.mount() == mount {
            return Some(&mut self.scatter);
        }
        if self.bubble.mount() == mount {
            return Some(&mut self.bubble);
        }
        self.histograms
            .iter_mut()
            .find(|h| h.mount() == mount)
            .map(|h| h as &mut dyn LinkedView)
    }

    /// Finishes a brush gesture on the widget mounted at `mount`; `None`
    /// clears it. Returns false for an unknown mount.
    pub fn brush(&mut self, mount: &str, region: Option<BrushRegion>) -> bool {
        let Some(widget) = self.widget_mut(mount) else {
            warn!(mount, "brush on unknown widget");
            return false;
        };
        let update = widget.handle_brush(region);
        self.select(update);
        true
    }

    pub fn brush_scatter(&mut self, region: Option<BrushRegion>) {
        let update = self.scatter.handle_brush(region);
        self.select(update);
    }

    pub fn brush_bubble(&mut self, region: Option<BrushRegion>) {
        let update = self.bubble.handle_brush(region);
        self.select(update);
    }

    /// Changes the histogram stacking from a selector value. Unknown names
    /// fall back to a single category. Channels are left untouched.
    pub fn set_grouping(&mut self, name: &str) -> Grouping {
        self.grouping = Grouping::parse(name);
        let selection = &self.selection;
        for h in &mut self.histograms {
            h.set_grouping(self.grouping, selection);
        }
        debug!(grouping = ?self.grouping, "grouping changed");
        self.grouping
    }

    /// Recolours scatter and bubble grid. Unknown or categorical names keep
    /// the current field.
    pub fn set_color_field(&mut self, name: &str) -> Field {
        match Field::from_name(name).filter(|f| f.is_numeric()) {
            Some(field) => {
                self.scatter.set_color_field(field);
                self.bubble.set_color_field(field);
            }
            None => warn!(field = name, "unsupported colour field, keeping the current one"),
        }
        self.scatter.color_field()
    }

    /// Checks or unchecks one category and updates that field's channel.
    pub fn toggle_category(&mut self, field: GroupingField, category: &str, checked: bool) {
        let Some(filter) = self.category_filters.get_mut(&field) else {
            return;
        };
        let constraint = filter.toggle(category, checked, &self.store);
        let channel = filter.channel();
        self.select(SelectionUpdate::single(channel, constraint));
    }

    /// Checkbox labels and states of `field`.
    pub fn category_options(&self, field: GroupingField) -> Vec<(String, bool)> {
        self.category_filters
            .get(&field)
            .map(CategoryFilter::options)
            .unwrap_or_default()
    }

    pub fn render_all(&self, renderer: &mut impl SceneRenderer) {
        for h in &self.histograms {
            renderer.draw(h.mount(), &h.scene());
        }
        renderer.draw(self.scatter.mount(), &self.scatter.scene());
        renderer.draw(self.bubble.mount(), &self.bubble.scene());
    }
}
