use crate::data_types::{Field, Grouping, GroupingField};
use d3rs::color::D3Color;
use d3rs::interpolate::piecewise_domain;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BAR_COLOR: &str = "#1f77b4";

const GENDER_COLORS: [(&str, &str); 3] = [
    ("Male", "#4A90E2"),
    ("Female", "#FF69B4"),
    ("Other", "#9E9E9E"),
];

const PLATFORM_COLORS: [(&str, &str); 6] = [
    ("Facebook", "#1f77b4"),
    ("Instagram", "#2ca02c"),
    ("LinkedIn", "#8c564b"),
    ("TikTok", "#ff7f0e"),
    ("X (Twitter)", "#9467bd"),
    ("YouTube", "#d62728"),
];

// used for platforms outside the known palette
const FALLBACK_COLORS: [&str; 4] = ["#17becf", "#bcbd22", "#e377c2", "#7f7f7f"];

const RAMP_DOMAIN: [f64; 5] = [1.0, 3.0, 6.0, 8.0, 10.0];
const LOW_IS_GOOD: [u32; 5] = [0x0f7a3d, 0x1a9850, 0xebc45b, 0xd73027, 0xac1b13];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Marks below this opacity do not show a tooltip.
    pub hover_opacity_threshold: f32,
    pub emphasized_opacity: f32,
    pub dimmed_opacity: f32,
    pub dot_opacity: f32,
    pub dot_radius: f32,
    pub selected_dot_radius: f32,
    pub dot_stroke: f32,
    pub selected_dot_stroke: f32,
    pub bubble_opacity: f32,
    pub bubble_radius: (f32, f32),
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            hover_opacity_threshold: 0.5,
            emphasized_opacity: 1.0,
            dimmed_opacity: 0.3,
            dot_opacity: 0.8,
            dot_radius: 5.0,
            selected_dot_radius: 7.0,
            dot_stroke: 0.1,
            selected_dot_stroke: 1.5,
            bubble_opacity: 0.8,
            bubble_radius: (2.0, 30.0),
        }
    }
}

impl ChartTheme {
    pub fn is_hoverable(&self, opacity: f32) -> bool {
        opacity >= self.hover_opacity_threshold
    }
}

/// Fill of a stacked segment for `category` under `grouping`.
pub fn category_color(grouping: Grouping, category: &str, index: usize) -> String {
    let palette: &[(&str, &str)] = match grouping {
        Grouping::All => return DEFAULT_BAR_COLOR.to_string(),
        Grouping::By(GroupingField::Gender) => &GENDER_COLORS,
        Grouping::By(GroupingField::SocialMediaPlatform) => &PLATFORM_COLORS,
    };
    palette
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| color.to_string())
        .unwrap_or_else(|| FALLBACK_COLORS[index % FALLBACK_COLORS.len()].to_string())
}

/// Piecewise-linear colour ramp over ascending stops.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    domain: Vec<f64>,
    // stop index at each domain value, fed to the piecewise interpolator
    positions: Vec<f64>,
    colors: Vec<D3Color>,
}

impl ColorRamp {
    fn from_hex(domain: &[f64], colors: &[u32]) -> Self {
        let n = domain.len().min(colors.len());
        Self {
            domain: domain[..n].to_vec(),
            positions: (0..n).map(|i| i as f64).collect(),
            colors: colors[..n].iter().map(|c| D3Color::from_hex(*c)).collect(),
        }
    }

    /// Green-to-red ramp where low values are good.
    pub fn stress() -> Self {
        Self::from_hex(&RAMP_DOMAIN, &LOW_IS_GOOD)
    }

    /// Red-to-green ramp where high values are good.
    pub fn happiness() -> Self {
        let mut reversed = LOW_IS_GOOD;
        reversed.reverse();
        Self::from_hex(&RAMP_DOMAIN, &reversed)
    }

    pub fn for_field(field: Field) -> Self {
        match field {
            Field::HappinessIndex => Self::happiness(),
            _ => Self::stress(),
        }
    }

    /// Colour at `value`, clamped to the end stops.
    pub fn color(&self, value: f64) -> String {
        let n = self.colors.len();
        let Some(first) = self.colors.first() else {
            return DEFAULT_BAR_COLOR.to_string();
        };
        if n == 1 || value.is_nan() {
            return first.to_hex();
        }
        let position = piecewise_domain(&self.domain, &self.positions)(value);
        let i = (position.floor().max(0.0) as usize).min(n - 2);
        let t = (position - i as f64) as f32;
        self.colors[i].interpolate(&self.colors[i + 1], t).to_hex()
    }
}
