use d3rs::scale::BandScale as D3BandScale;
use d3rs::scale::{sqrt_scale, LinearScale, PowScale, Scale as D3Scale};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartScale {
    Linear(LinearScale),
    /// Square-root scale, used so bubble area tracks the count.
    Sqrt(PowScale),
}

// A zero-width domain maps everything to NaN, so widen it around the value.
fn widen(domain: (f64, f64)) -> (f64, f64) {
    let (mut d_min, mut d_max) = domain;
    if (d_max - d_min).abs() < f64::EPSILON {
        d_min -= 0.5;
        d_max += 0.5;
    }
    (d_min, d_max)
}

impl ChartScale {
    pub fn new_linear(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (d_min, d_max) = widen(domain);
        let scale = LinearScale::new()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self::Linear(scale)
    }

    pub fn new_sqrt(domain: (f64, f64), range: (f32, f32)) -> Self {
        let scale = sqrt_scale()
            .domain(domain.0.max(0.0), domain.1.max(0.0))
            .range(range.0 as f64, range.1 as f64);
        Self::Sqrt(scale)
    }

    /// Extends the domain outwards to round tick steps.
    pub fn nice(self, count: usize) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(s.nice(Some(count))),
            Self::Sqrt(s) => Self::Sqrt(s.nice(Some(count))),
        }
    }

    pub fn map(&self, value: f64) -> f32 {
        let res = match self {
            Self::Linear(s) => s.scale(value) as f32,
            Self::Sqrt(s) => s.scale(value.max(0.0)) as f32,
        };
        if res.is_nan() || res.is_infinite() {
            0.0
        } else {
            res
        }
    }

    pub fn invert(&self, pixel: f32) -> f64 {
        let res = match self {
            Self::Linear(s) => s.invert(pixel as f64),
            Self::Sqrt(s) => s.invert(pixel as f64),
        };
        res.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    pub fn range(&self) -> (f32, f32) {
        let (r0, r1) = match self {
            Self::Linear(s) => D3Scale::range(s),
            Self::Sqrt(s) => D3Scale::range(s),
        };
        (r0 as f32, r1 as f32)
    }

    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => D3Scale::domain(s),
            Self::Sqrt(s) => D3Scale::domain(s),
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Sqrt(s) => s.ticks(count),
        }
    }
}

/// Equal bands over an ordered list of keys.
///
/// The d3 band scale always steps towards higher pixels, so an inverted
/// range is laid out by reversing the band order instead.
#[derive(Clone, Debug)]
pub struct BandScale<K> {
    keys: Vec<K>,
    bands: D3BandScale<usize>,
}

impl<K: PartialEq> BandScale<K> {
    pub fn new(keys: Vec<K>, range: (f32, f32), padding: f32) -> Self {
        let (lo, hi) = (range.0.min(range.1) as f64, range.0.max(range.1) as f64);
        let order: Vec<usize> = if range.1 < range.0 {
            (0..keys.len()).rev().collect()
        } else {
            (0..keys.len()).collect()
        };
        let bands = D3BandScale::new()
            .domain(order)
            .range(lo, hi)
            .padding(padding as f64);
        Self { keys, bands }
    }

    pub fn bandwidth(&self) -> f32 {
        self.bands.bandwidth() as f32
    }

    /// Centre of the band for `key`, `None` if the key is not in the domain.
    pub fn center(&self, key: &K) -> Option<f32> {
        let idx = self.keys.iter().position(|k| k == key)?;
        let start = self.bands.scale(&idx)?;
        Some((start + self.bands.bandwidth() / 2.0) as f32)
    }

    pub fn domain(&self) -> &[K] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_keeps_round_domains() {
        let s = ChartScale::new_linear((0.0, 11.0), (0.0, 100.0)).nice(10);
        assert_eq!(s.domain(), (0.0, 11.0));
    }

    #[test]
    fn test_nice_extends_ragged_domains() {
        let s = ChartScale::new_linear((0.0, 21.7), (100.0, 0.0)).nice(10);
        assert_eq!(s.domain(), (0.0, 22.0));
        assert_eq!(s.range(), (100.0, 0.0));
    }

    #[test]
    fn test_inverted_range() {
        let s = ChartScale::new_linear((1.0, 10.0), (90.0, 0.0));
        assert_eq!(s.map(1.0), 90.0);
        assert_eq!(s.map(10.0), 0.0);
        assert!((s.invert(45.0) - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_flat_domain_is_widened() {
        let s = ChartScale::new_linear((4.0, 4.0), (0.0, 10.0));
        assert_eq!(s.domain(), (3.5, 4.5));
        assert_eq!(s.map(4.0), 5.0);
    }

    #[test]
    fn test_ticks_follow_domain() {
        let s = ChartScale::new_linear((0.0, 10.0), (0.0, 100.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&10.0));
    }

    #[test]
    fn test_sqrt_scale_tracks_area() {
        let s = ChartScale::new_sqrt((0.0, 100.0), (0.0, 10.0));
        assert!((s.map(25.0) - 5.0).abs() < 1e-5);
        assert_eq!(s.map(-3.0), 0.0);
        // empty grids give a zero-width domain
        assert_eq!(ChartScale::new_sqrt((0.0, 0.0), (2.0, 30.0)).map(0.0), 0.0);
    }

    #[test]
    fn test_band_centres_are_ordered() {
        let band = BandScale::new((0..=7).collect::<Vec<i64>>(), (0.0, 800.0), 0.1);
        let a = band.center(&0).unwrap();
        let b = band.center(&1).unwrap();
        assert!(a < b);
        assert!(band.center(&8).is_none());
        assert!(band.bandwidth() > 0.0);
    }

    #[test]
    fn test_inverted_band_range_puts_first_key_at_bottom() {
        let band = BandScale::new(vec![1i64, 2, 3], (300.0, 0.0), 0.0);
        assert_eq!(band.center(&1), Some(250.0));
        assert_eq!(band.center(&3), Some(50.0));
        assert_eq!(band.bandwidth(), 100.0);
    }
}
