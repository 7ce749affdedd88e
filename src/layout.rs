use serde::{Deserialize, Serialize};

pub const HISTOGRAM_SIZE: (f32, f32) = (250.0, 200.0);
pub const SCATTER_SIZE: (f32, f32) = (700.0, 490.0);
pub const BUBBLE_SIZE: (f32, f32) = (700.0, 490.0);

const MARGIN_PCT: f32 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn proportional(width: f32, height: f32) -> Self {
        Self {
            top: height * MARGIN_PCT,
            right: width * MARGIN_PCT,
            bottom: height * MARGIN_PCT,
            left: width * MARGIN_PCT,
        }
    }
}

/// Outer size of a chart and the plot area left inside its margins.
///
/// All widget geometry (marks, brush regions) lives in plot-area coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub margin: Margins,
}

impl ChartLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: Margins::proportional(width, height),
        }
    }

    pub fn from_size(size: (f32, f32)) -> Self {
        Self::new(size.0, size.1)
    }

    pub fn plot_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn plot_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

/// Width of one histogram bar: the narrower of an even split over the bins
/// and one bin width in data units, leaving a 5% gap.
pub fn bar_width(plot_width: f32, bin_count: usize, domain_span: f64, bin_width: f64) -> f32 {
    if bin_count == 0 || domain_span <= 0.0 {
        return 0.0;
    }
    let by_count = plot_width / bin_count as f32;
    let by_span = (plot_width as f64 / domain_span * bin_width) as f32;
    by_count.min(by_span) * 0.95
}
