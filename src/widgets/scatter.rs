use super::{BrushRegion, BrushState, LinkedView, Tooltip};
use crate::data_types::{DotMark, Field, RecordId, Scene, ScatterConfig, ScatterScene};
use crate::layout::{ChartLayout, SCATTER_SIZE};
use crate::record_store::RecordStore;
use crate::scales::ChartScale;
use crate::selection::{ChannelName, CombinedSelection, SelectionState};
use crate::theme::{ChartTheme, ColorRamp};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

pub const SCATTER_CHANNEL: &str = "Scatter";

/// One dot per record, coloured by a numeric field.
pub struct ScatterPlot {
    mount: String,
    channel: ChannelName,
    store: Arc<RecordStore>,
    x_field: Field,
    y_field: Field,
    layout: ChartLayout,
    x_scale: ChartScale,
    y_scale: ChartScale,
    color_field: Field,
    ramp: ColorRamp,
    combined: CombinedSelection,
    brush: BrushState,
    theme: ChartTheme,
    scene: ScatterScene,
}

impl ScatterPlot {
    pub fn new(
        store: Arc<RecordStore>,
        config: &ScatterConfig,
        color_field: Field,
        selection: &SelectionState,
    ) -> Self {
        let layout = ChartLayout::from_size(SCATTER_SIZE);
        let x_scale = ChartScale::new_linear(config.x_domain, (0.0, layout.plot_width())).nice(10);
        let y_scale = ChartScale::new_linear(config.y_domain, (layout.plot_height(), 0.0)).nice(10);
        let color_field = if color_field.is_numeric() {
            color_field
        } else {
            Field::StressLevel
        };

        let mut scatter = Self {
            mount: config.mount.clone(),
            channel: ChannelName::new(SCATTER_CHANNEL),
            store,
            x_field: config.x_field,
            y_field: config.y_field,
            layout,
            x_scale,
            y_scale,
            color_field,
            ramp: ColorRamp::for_field(color_field),
            combined: selection.combined().clone(),
            brush: BrushState::Unbrushed,
            theme: ChartTheme::default(),
            scene: ScatterScene::default(),
        };
        scatter.render();
        scatter
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn color_field(&self) -> Field {
        self.color_field
    }

    /// Plot-area position of a record, `None` for unknown ids.
    pub fn position(&self, id: RecordId) -> Option<(f32, f32)> {
        let record = self.store.get(id)?;
        Some((
            self.x_scale.map(record.number(self.x_field)?),
            self.y_scale.map(record.number(self.y_field)?),
        ))
    }

    /// Recolours the dots by `field`. Categorical fields are rejected and the
    /// current colouring kept.
    pub fn set_color_field(&mut self, field: Field) -> bool {
        if !field.is_numeric() {
            warn!(field = field.name(), "colour field must be numeric");
            return false;
        }
        self.color_field = field;
        self.ramp = ColorRamp::for_field(field);
        self.render();
        true
    }
}

impl LinkedView for ScatterPlot {
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
                self.position(r.id)
                    .is_some_and(|(x, y)| region.contains(x, y))
            })
            .map(|r| r.id)
            .collect()
    }

    fn apply_selection(&mut self, selection: &SelectionState) {
        self.combined = selection.combined().clone();
        self.render();
    }

    fn render(&mut self) {
        let theme = &self.theme;
        let dots = self
            .store
            .records()
            .iter()
            .filter_map(|r| {
                let (cx, cy) = self.position(r.id)?;
                let (opacity, radius, stroke) = if self.combined.is_unconstrained() {
                    (theme.dot_opacity, theme.dot_radius, theme.dot_stroke)
                } else if self.combined.contains(r.id) {
                    (
                        theme.emphasized_opacity,
                        theme.selected_dot_radius,
                        theme.selected_dot_stroke,
                    )
                } else {
                    (theme.dimmed_opacity, theme.dot_radius, theme.dot_stroke)
                };
                Some(DotMark {
                    id: r.id,
                    cx,
                    cy,
                    r: radius,
                    opacity,
                    stroke_width: stroke,
                    color: self.ramp.color(r.number(self.color_field).unwrap_or(f64::NAN)),
                })
            })
            .collect();

        self.scene = ScatterScene {
            title: format!("{} vs {}", self.x_field.label(), self.y_field.label()),
            color_field: self.color_field.name().to_string(),
            dots,
        };
    }

    fn scene(&self) -> Scene {
        Scene::Scatter(self.scene.clone())
    }

    fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let dot = self.scene.dots.get(index)?;
        if !self.theme.is_hoverable(dot.opacity) {
            return None;
        }
        let record = self.store.get(dot.id)?;
        Some(
            Tooltip::new()
                .line("Daily Screen Time", record.daily_screen_time)
                .line("Sleep Quality", record.sleep_quality)
                .line("Stress Level", record.stress_level)
                .line("Happiness", record.happiness_index),
        )
    }
}
