//! Spectral analysis of an accumulated Fisher matrix.
//!
//! Rank counts eigenvalue magnitudes above `max|lambda| * size * EPSILON`,
//! the numpy `matrix_rank` default applied to the symmetric spectrum (for a
//! positive semi-definite matrix the singular values are the eigenvalue
//! magnitudes). The diagnostic log-transform filters non-positive magnitudes
//! separately and never feeds back into the rank.

use tracing::warn;

use crate::core::fisher::FisherMatrix;

/// Rank and eigenvalue magnitudes of one trial's Fisher matrix.
#[derive(Clone, Debug)]
pub struct Spectrum {
    /// Eigenvalue magnitudes, sorted descending.
    pub eigenvalues: Vec<f64>,
    /// Count of magnitudes above the rank tolerance.
    pub rank: usize,
    /// Largest magnitude (0 for an all-zero matrix).
    pub max_abs: f64,
}

pub fn analyze(fisher: &FisherMatrix) -> Spectrum {
    let size = fisher.size();
    let raw = fisher.matrix().symmetric_eigenvalues();

    let mut eigenvalues: Vec<f64> = raw.iter().map(|&l| l.abs()).collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));

    let max_abs = eigenvalues.first().copied().unwrap_or(0.0);
    let tol = max_abs * size as f64 * f64::EPSILON;
    let rank = eigenvalues.iter().filter(|&&l| l > tol).count();

    // The accumulation is PSD in exact arithmetic; a negative eigenvalue
    // beyond the rank tolerance means the abs step is papering over more
    // than solver noise.
    if let Some(worst) = raw.iter().copied().filter(|&l| l < -tol).min_by(f64::total_cmp) {
        warn!(
            eigenvalue = worst,
            tolerance = tol,
            "negative eigenvalue beyond tolerance in PSD accumulation"
        );
    }

    Spectrum {
        eigenvalues,
        rank,
        max_abs,
    }
}

/// Diagnostic transform: log10 of each positive eigenvalue magnitude minus
/// log10(nevent), visualizing convergence to a per-event scaling law. Zeros
/// (and anything below the representable floor) are dropped before the log;
/// this filtering is independent of the rank tolerance.
pub fn log10_excess(eigenvalues: &[f64], nevent: usize) -> Vec<f64> {
    let shift = (nevent as f64).log10();
    eigenvalues
        .iter()
        .filter(|&&l| l > 0.0)
        .map(|&l| l.log10() - shift)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_matrix_has_rank_zero() {
        let fisher = FisherMatrix::zeros(5);
        let spec = analyze(&fisher);
        assert_eq!(spec.rank, 0);
        assert_eq!(spec.max_abs, 0.0);
        assert_eq!(spec.eigenvalues.len(), 5);
    }

    #[test]
    fn single_outer_product_has_rank_one() {
        let mut fisher = FisherMatrix::zeros(4);
        fisher.accumulate(&[1.0, 2.0, 3.0, 4.0]);
        let spec = analyze(&fisher);
        assert_eq!(spec.rank, 1);
        // The only nonzero eigenvalue of p p^T is |p|^2 = 30.
        assert!((spec.max_abs - 30.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_events_add_rank() {
        let mut fisher = FisherMatrix::zeros(3);
        fisher.accumulate(&[1.0, 0.0, 0.0]);
        fisher.accumulate(&[0.0, 2.0, 0.0]);
        let spec = analyze(&fisher);
        assert_eq!(spec.rank, 2);
        assert!((spec.max_abs - 4.0).abs() < 1e-9);
    }

    #[test]
    fn proportional_events_do_not_add_rank() {
        let mut fisher = FisherMatrix::zeros(3);
        fisher.accumulate(&[1.0, 2.0, 3.0]);
        fisher.accumulate(&[2.0, 4.0, 6.0]);
        let spec = analyze(&fisher);
        assert_eq!(spec.rank, 1);
    }

    #[test]
    fn magnitudes_are_sorted_and_nonnegative() {
        let mut fisher = FisherMatrix::zeros(4);
        for event in [[1.0, 0.5, 0.0, 0.2], [0.0, 1.0, 1.0, 0.0], [3.0, 0.0, 0.1, 0.7]] {
            fisher.accumulate(&event);
        }
        let spec = analyze(&fisher);
        assert!(spec.eigenvalues.iter().all(|&l| l >= 0.0));
        assert!(spec.eigenvalues.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(spec.max_abs, spec.eigenvalues[0]);
    }

    #[test]
    fn eigenvalue_sum_matches_trace() {
        let mut fisher = FisherMatrix::zeros(3);
        fisher.accumulate(&[1.0, 2.0, 3.0]);
        fisher.accumulate(&[0.5, 0.5, 0.5]);
        let trace: f64 = (0..3).map(|i| fisher.matrix()[(i, i)]).sum();
        let spec = analyze(&fisher);
        let total: f64 = spec.eigenvalues.iter().sum();
        assert!((total - trace).abs() < 1e-9, "sum {total} vs trace {trace}");
    }

    #[test]
    fn log10_excess_drops_zeros_without_touching_rank() {
        let mut fisher = FisherMatrix::zeros(4);
        fisher.accumulate(&[1.0, 0.0, 0.0, 0.0]);
        let spec = analyze(&fisher);
        let excess = log10_excess(&spec.eigenvalues, 10);
        assert_eq!(spec.rank, 1);
        assert_eq!(excess.len(), 1);
        // lambda = 1, nevent = 10 => log10(1) - 1 = -1.
        assert!((excess[0] + 1.0).abs() < 1e-9);
    }
}
