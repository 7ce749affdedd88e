use super::{BrushRegion, BrushState, LinkedView, Tooltip};
use crate::aggregation::aggregate_bubbles;
use crate::data_types::{BubbleCell, BubbleConfig, BubbleMark, BubbleScene, Field, RecordId, Scene};
use crate::layout::{ChartLayout, BUBBLE_SIZE};
use crate::record_store::RecordStore;
use crate::scales::{BandScale, ChartScale};
use crate::selection::{ChannelName, CombinedSelection, SelectionState};
use crate::theme::{ChartTheme, ColorRamp};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

pub const BUBBLE_CHANNEL: &str = "Bubble";

const BAND_PADDING: f32 = 0.1;

/// Two-field grid of bubbles sized by population and coloured by the mean of
/// a numeric field.
pub struct BubbleGrid {
    mount: String,
    channel: ChannelName,
    store: Arc<RecordStore>,
    x_field: Field,
    y_field: Field,
    layout: ChartLayout,
    x_band: BandScale<i64>,
    y_band: BandScale<i64>,
    color_field: Field,
    ramp: ColorRamp,
    combined: CombinedSelection,
    cells: Vec<BubbleCell>,
    brush: BrushState,
    theme: ChartTheme,
    scene: BubbleScene,
}

impl BubbleGrid {
    pub fn new(
        store: Arc<RecordStore>,
        config: &BubbleConfig,
        color_field: Field,
        selection: &SelectionState,
    ) -> Self {
        let layout = ChartLayout::from_size(BUBBLE_SIZE);
        let x_band = BandScale::new(config.x_values.clone(), (0.0, layout.plot_width()), BAND_PADDING);
        let y_band = BandScale::new(config.y_values.clone(), (layout.plot_height(), 0.0), BAND_PADDING);
        let color_field = if color_field.is_numeric() {
            color_field
        } else {
            Field::StressLevel
        };

        let mut grid = Self {
            mount: config.mount.clone(),
            channel: ChannelName::new(BUBBLE_CHANNEL),
            store,
            x_field: config.x_field,
            y_field: config.y_field,
            layout,
            x_band,
            y_band,
            color_field,
            ramp: ColorRamp::for_field(color_field),
            combined: selection.combined().clone(),
            cells: Vec::new(),
            brush: BrushState::Unbrushed,
            theme: ChartTheme::default(),
            scene: BubbleScene::default(),
        };
        grid.reaggregate();
        grid
    }

    pub fn cells(&self) -> &[BubbleCell] {
        &self.cells
    }

    pub fn cell(&self, x: i64, y: i64) -> Option<&BubbleCell> {
        self.cells.iter().find(|c| c.x == x && c.y == y)
    }

    pub fn color_field(&self) -> Field {
        self.color_field
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Centre of cell (x, y) in plot-area pixels, `None` outside the grid.
    pub fn center(&self, x: i64, y: i64) -> Option<(f32, f32)> {
        Some((self.x_band.center(&x)?, self.y_band.center(&y)?))
    }

    /// Switches the field averaged for colour. Categorical fields are rejected.
    pub fn set_color_field(&mut self, field: Field) -> bool {
        if !field.is_numeric() {
            warn!(field = field.name(), "colour field must be numeric");
            return false;
        }
        self.color_field = field;
        self.ramp = ColorRamp::for_field(field);
        self.reaggregate();
        true
    }

    fn reaggregate(&mut self) {
        self.cells = aggregate_bubbles(
            self.store.records(),
            self.x_field,
            self.y_field,
            self.color_field,
            &self.combined,
        );
        self.render();
    }
}

impl LinkedView for BubbleGrid {
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
        self.cells
            .iter()
            .filter(|c| {
                self.center(c.x, c.y)
                    .is_some_and(|(cx, cy)| region.contains(cx, cy))
            })
            .flat_map(|c| c.ids.iter().copied())
            .collect()
    }

    fn apply_selection(&mut self, selection: &SelectionState) {
        self.combined = selection.combined().clone();
        self.reaggregate();
    }

    fn render(&mut self) {
        let max_count = self.cells.iter().map(|c| c.count).max().unwrap_or(0);
        let size = ChartScale::new_sqrt((0.0, max_count as f64), self.theme.bubble_radius);
        let constrained = !self.combined.is_unconstrained();

        let bubbles = self
            .cells
            .iter()
            .filter_map(|c| {
                let (cx, cy) = self.center(c.x, c.y)?;
                let opacity = if constrained && c.selected_count == 0 {
                    self.theme.dimmed_opacity
                } else {
                    self.theme.bubble_opacity
                };
                Some(BubbleMark {
                    x: c.x,
                    y: c.y,
                    cx,
                    cy,
                    r: size.map(c.count as f64),
                    color: self.ramp.color(c.avg_value),
                    opacity,
                    count: c.count,
                    selected_count: c.selected_count,
                })
            })
            .collect();

        self.scene = BubbleScene {
            title: format!("{} vs {}", self.x_field.label(), self.y_field.label()),
            color_field: self.color_field.name().to_string(),
            bubbles,
        };
    }

    fn scene(&self) -> Scene {
        Scene::Bubble(self.scene.clone())
    }

    fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let mark = self.scene.bubbles.get(index)?;
        if !self.theme.is_hoverable(mark.opacity) {
            return None;
        }
        let cell = self.cell(mark.x, mark.y)?;
        Some(
            Tooltip::new()
                .line(self.x_field.label(), cell.x)
                .line(self.y_field.label(), cell.y)
                .line("Number of People", cell.count)
                .line(
                    format!("Avg {}", self.color_field.label()),
                    format!("{:.2}", cell.avg_value),
                ),
        )
    }
}
