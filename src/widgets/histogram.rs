use super::{BrushRegion, BrushState, LinkedView, Tooltip};
use crate::aggregation::{aggregate, Binning};
use crate::data_types::{
    Aggregation, BarMark, BinKey, Grouping, HistogramConfig, HistogramScene, RecordId, Scene,
};
use crate::layout::{bar_width, ChartLayout, HISTOGRAM_SIZE};
use crate::record_store::RecordStore;
use crate::scales::{BandScale, ChartScale};
use crate::selection::{ChannelConstraint, ChannelName, SelectionState};
use crate::theme::{category_color, ChartTheme};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Horizontal placement of bins: numeric keys on a linear axis, labels on bands.
#[derive(Clone, Debug)]
enum BinAxis {
    Linear(ChartScale),
    Band(BandScale<BinKey>),
}

/// Stacked histogram of one field, optionally split by a grouping field.
pub struct Histogram {
    mount: String,
    channel: ChannelName,
    store: Arc<RecordStore>,
    binning: Binning,
    keys: Vec<BinKey>,
    layout: ChartLayout,
    axis: BinAxis,
    grouping: Grouping,
    aggregation: Aggregation,
    brush: BrushState,
    theme: ChartTheme,
    scene: HistogramScene,
}

impl Histogram {
    /// Builds the widget and aggregates it against the current selection.
    ///
    /// Brushes write to the channel named after the mount, so two histograms
    /// of one field keep separate brushes.
    pub fn new(store: Arc<RecordStore>, config: &HistogramConfig, selection: &SelectionState) -> Self {
        let binning = Binning::new(config.field, config.bin_width, config.is_interval);
        let keys = binning.all_keys(store.records());
        let layout = ChartLayout::from_size(HISTOGRAM_SIZE);
        let axis = Self::build_axis(&keys, config.bin_width, layout.plot_width());

        let mut histogram = Self {
            mount: config.mount.clone(),
            channel: ChannelName::new(&config.mount),
            store,
            binning,
            keys,
            layout,
            axis,
            grouping: Grouping::All,
            aggregation: Aggregation::default(),
            brush: BrushState::Unbrushed,
            theme: ChartTheme::default(),
            scene: HistogramScene::default(),
        };
        histogram.apply_selection(selection);
        histogram
    }

    // Fixed for the widget's lifetime so the axis does not jitter under filters.
    fn build_axis(keys: &[BinKey], bin_width: f64, plot_width: f32) -> BinAxis {
        if keys.iter().any(|k| k.as_value().is_none()) {
            return BinAxis::Band(BandScale::new(keys.to_vec(), (0.0, plot_width), 0.05));
        }
        let max_key = keys
            .iter()
            .filter_map(BinKey::as_value)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_key = if max_key.is_finite() { max_key } else { 0.0 };
        BinAxis::Linear(ChartScale::new_linear(
            (-0.1 - bin_width / 2.0, max_key + bin_width / 2.0),
            (0.0, plot_width),
        ))
    }

    pub fn binning(&self) -> &Binning {
        &self.binning
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Bin keys of the unfiltered dataset.
    pub fn keys(&self) -> &[BinKey] {
        &self.keys
    }

    /// Centre of a bin in plot-area pixels.
    pub fn key_position(&self, key: &BinKey) -> Option<f32> {
        match (&self.axis, key) {
            (BinAxis::Linear(scale), BinKey::Value(v)) => Some(scale.map(*v)),
            (BinAxis::Linear(_), BinKey::Label(_)) => None,
            (BinAxis::Band(band), key) => band.center(key),
        }
    }

    pub fn x_domain(&self) -> (f64, f64) {
        match &self.axis {
            BinAxis::Linear(scale) => scale.domain(),
            BinAxis::Band(band) => (0.0, band.domain().len() as f64),
        }
    }

    /// Switches the stacking field and re-aggregates against `selection`.
    pub fn set_grouping(&mut self, grouping: Grouping, selection: &SelectionState) {
        self.grouping = grouping;
        self.apply_selection(selection);
    }

    fn bar_width(&self) -> f32 {
        let plot_width = self.layout.plot_width();
        match &self.axis {
            BinAxis::Linear(scale) => {
                let (d0, d1) = scale.domain();
                bar_width(plot_width, self.keys.len(), d1 - d0, self.binning.bin_width)
            }
            BinAxis::Band(band) => band.bandwidth(),
        }
    }
}

impl LinkedView for Histogram {
    fn mount(&self) -> &str {
        &self.mount
    }

    fn channel(&self) -> &ChannelName {
        &self.channel
    }

    fn brush_state(&self) -> BrushState {
        self.brush
    }

    fn set_brush_state(&mut self, state: BrushState) {
        self.brush = state;
    }

    fn hit_test(&self, region: &BrushRegion) -> HashSet<RecordId> {
        self.store
            .records()
            .par_iter()
            .filter(|r| {
                self.key_position(&self.binning.key(r))
                    .is_some_and(|px| region.contains_x(px))
            })
            .map(|r| r.id)
            .collect()
    }

    fn apply_selection(&mut self, selection: &SelectionState) {
        let unconstrained = ChannelConstraint::Unconstrained;
        let category_filter = match self.grouping.field() {
            Some(g) => selection.channel(&g.channel()),
            None => &unconstrained,
        };
        self.aggregation = aggregate(
            self.store.records(),
            &self.binning,
            &self.keys,
            self.grouping,
            category_filter,
            selection.combined(),
        );
        self.render();
    }

    fn render(&mut self) {
        let plot_height = self.layout.plot_height();
        let max_stack = self
            .aggregation
            .bins
            .iter()
            .map(|b| b.total_selected())
            .max()
            .unwrap_or(0);
        let y_max = if max_stack == 0 {
            1.0
        } else {
            max_stack as f64 * 1.05
        };
        let y_scale = ChartScale::new_linear((0.0, y_max), (plot_height, 0.0)).nice(10);
        let width = self.bar_width();

        let mut bars = Vec::with_capacity(self.aggregation.bins.len() * self.aggregation.categories.len());
        for bin in &self.aggregation.bins {
            let Some(center) = self.key_position(&bin.key) else {
                continue;
            };
            let mut y0 = 0usize;
            for (idx, category) in self.aggregation.categories.iter().enumerate() {
                let counts = bin.get(category);
                let y1 = y0 + counts.selected_count;
                let top = y_scale.map(y1 as f64);
                let bottom = y_scale.map(y0 as f64);
                bars.push(BarMark {
                    key: bin.key.clone(),
                    category: category.clone(),
                    x: center - width / 2.0,
                    width,
                    y: top,
                    height: (bottom - top).max(0.0),
                    value: counts.selected_count,
                    total: counts.count,
                    color: category_color(self.grouping, category, idx),
                    opacity: self.theme.emphasized_opacity,
                });
                y0 = y1;
            }
        }

        self.scene = HistogramScene {
            title: self.binning.field.label(),
            categories: self.aggregation.categories.clone(),
            x_domain: self.x_domain(),
            y_domain: y_scale.domain(),
            y_ticks: y_scale.ticks(5),
            bars,
        };
    }

    fn scene(&self) -> Scene {
        Scene::Histogram(self.scene.clone())
    }

    fn tooltip(&self, index: usize) -> Option<Tooltip> {
        // bars are never dimmed, so every segment is hoverable
        let bar = self.scene.bars.get(index)?;

        let mut tooltip = Tooltip::new().line("Count", bar.value);
        if bar.total > 0 && bar.value < bar.total {
            let ratio = bar.value as f64 / bar.total as f64 * 100.0;
            tooltip = tooltip.line("Select", format!("{:.1}%", ratio));
        }
        let value = match bar.key {
            BinKey::Value(v) if self.binning.is_interval => {
                let half = self.binning.bin_width / 2.0;
                format!("{} - {}", v - half, v + half)
            }
            ref key => key.to_string(),
        };
        tooltip = tooltip.line("Value", value);
        if self.grouping.field().is_some() {
            tooltip = tooltip.line("Group", &bar.category);
        }
        Some(tooltip)
    }
}
