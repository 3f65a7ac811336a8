//! core/grid.rs — fixed support grids for single-event distributions.
//!
//! Every model family evaluates its density on one of these grids and scales
//! by the grid's area element, so a weight vector always carries an implicit
//! `p(x) dx` per bin.

use std::f64::consts::PI;

/// Domain of a support grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// Closed unit interval [0, 1], linear spacing.
    UnitInterval,
    /// Bin midpoints of (0, 1); endpoints excluded.
    OpenUnitInterval,
    /// Circle [-pi, pi); the periodic endpoint is excluded so the last point
    /// is not counted twice.
    Circle,
    /// Integer pixel index 0..size.
    PixelIndex,
}

/// Ordered support points plus the per-bin area element, fixed for the
/// duration of a sweep.
#[derive(Clone, Debug)]
pub struct SupportGrid {
    points: Vec<f64>,
    cell: f64,
    domain: Domain,
}

impl SupportGrid {
    /// Linear grid over [0, 1] with both endpoints included.
    pub fn unit_interval(size: usize) -> Self {
        assert!(size > 0);
        let cell = if size > 1 { 1.0 / (size - 1) as f64 } else { 1.0 };
        let points = (0..size).map(|i| i as f64 * cell).collect();
        Self {
            points,
            cell,
            domain: Domain::UnitInterval,
        }
    }

    /// Midpoint grid over the open interval (0, 1).
    pub fn open_unit_interval(size: usize) -> Self {
        assert!(size > 0);
        let cell = 1.0 / size as f64;
        let points = (0..size).map(|i| (i as f64 + 0.5) * cell).collect();
        Self {
            points,
            cell,
            domain: Domain::OpenUnitInterval,
        }
    }

    /// Circular grid over [-pi, pi), periodic endpoint excluded.
    pub fn circle(size: usize) -> Self {
        assert!(size > 0);
        let cell = 2.0 * PI / size as f64;
        let points = (0..size).map(|i| -PI + i as f64 * cell).collect();
        Self {
            points,
            cell,
            domain: Domain::Circle,
        }
    }

    /// Pixel-index grid 0..size with unit area element.
    pub fn pixels(size: usize) -> Self {
        assert!(size > 0);
        let points = (0..size).map(|i| i as f64).collect();
        Self {
            points,
            cell: 1.0,
            domain: Domain::PixelIndex,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Area element of one bin.
    #[inline]
    pub fn cell(&self) -> f64 {
        self.cell
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[inline]
    pub fn assert_weights_len<T>(&self, weights: &[T]) {
        debug_assert_eq!(weights.len(), self.len(), "weight vector length mismatch");
    }
}
