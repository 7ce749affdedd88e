use super::aggregates::BinKey;
use super::record::RecordId;
use serde::Serialize;

/// One stacked segment of a histogram bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarMark {
    pub key: BinKey,
    pub category: String,
    pub x: f32,
    pub width: f32,
    pub y: f32,
    pub height: f32,
    /// Selected records stacked in this segment.
    pub value: usize,
    /// Category population of the bin, selected or not.
    pub total: usize,
    pub color: String,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DotMark {
    pub id: RecordId,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub opacity: f32,
    pub stroke_width: f32,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleMark {
    pub x: i64,
    pub y: i64,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub color: String,
    pub opacity: f32,
    pub count: usize,
    pub selected_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HistogramScene {
    pub title: String,
    pub categories: Vec<String>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    /// Count axis ticks over `y_domain`.
    pub y_ticks: Vec<f64>,
    pub bars: Vec<BarMark>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScatterScene {
    pub title: String,
    pub color_field: String,
    pub dots: Vec<DotMark>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BubbleScene {
    pub title: String,
    pub color_field: String,
    pub bubbles: Vec<BubbleMark>,
}

/// Everything a renderer needs to draw one widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scene {
    Histogram(HistogramScene),
    Scatter(ScatterScene),
    Bubble(BubbleScene),
}
