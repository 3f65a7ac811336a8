//! Type 2 quantiles (Hyndman & Fan 1996) and five-number box statistics for
//! the cross-trial summary reports.

/// Five-number summary of one event count's trial results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Compute the summary from an unordered sample. Returns `None` for an
    /// empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            min: sorted[0],
            q1: quantile_type2(&sorted, 0.25),
            median: quantile_type2(&sorted, 0.5),
            q3: quantile_type2(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Type 2 quantile of a sorted sample: inverse empirical CDF with averaging
/// at discontinuities, h = n p + 1/2, q = (x[floor(h)] + x[ceil(h)]) / 2.
pub fn quantile_type2(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "quantile of empty sample");
    assert!((0.0..=1.0).contains(&p), "quantile probability out of range");
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = n as f64 * p + 0.5;
    let lo = (h.floor() as usize).saturating_sub(1).min(n - 1);
    let hi = (h.ceil() as usize).saturating_sub(1).min(n - 1);
    0.5 * (sorted[lo] + sorted[hi])
}
