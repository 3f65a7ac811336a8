//! Fisher-information accumulation.
//!
//! Each simulated event contributes the outer product of its weight vector
//! with itself; under an additive-information approximation across
//! independent events the accumulated matrix is a proxy for the Fisher
//! information of the simulated set. The buffer is reused across trials but
//! carries no state between them: `reset` is mandatory at trial start.

use nalgebra::{DMatrix, DVector};

#[derive(Clone, Debug)]
pub struct FisherMatrix {
    matrix: DMatrix<f64>,
    nevents: usize,
}

impl FisherMatrix {
    pub fn zeros(size: usize) -> Self {
        assert!(size > 0);
        Self {
            matrix: DMatrix::zeros(size, size),
            nevents: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of events accumulated since the last reset.
    #[inline]
    pub fn nevents(&self) -> usize {
        self.nevents
    }

    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Zero the accumulation. Must run before every trial; no additive
    /// carry-over between trials is permitted.
    pub fn reset(&mut self) {
        self.matrix.fill(0.0);
        self.nevents = 0;
    }

    /// Add one event's outer product p * p^T.
    pub fn accumulate(&mut self, weights: &[f64]) {
        assert_eq!(
            weights.len(),
            self.size(),
            "event vector length {} does not match matrix size {}",
            weights.len(),
            self.size()
        );
        let v = DVector::from_column_slice(weights);
        self.matrix.ger(1.0, &v, &v, 1.0);
        self.nevents += 1;
    }

    /// Largest |F - F^T| entry; zero up to rounding by construction.
    pub fn asymmetry(&self) -> f64 {
        let n = self.size();
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in (i + 1)..n {
                worst = worst.max((self.matrix[(i, j)] - self.matrix[(j, i)]).abs());
            }
        }
        worst
    }
}
