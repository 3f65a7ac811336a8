//! Single-event distribution generators.
//!
//! One variant per model family, all exposing the same contract: a fixed
//! support grid chosen at construction, and `draw`, which pulls fresh
//! randomness (a random center or sky location) and returns a non-negative
//! weight vector of grid length carrying the grid's area element.
//! Configuration problems surface at construction, never at draw time.

use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

use crate::config::{Mode, RunConfig, SkyParams};
use crate::core::grid::SupportGrid;
use crate::core::skysim::{downsample_mass, SkySimulator};
use crate::core::special::{bessel_i0, ln_beta};

/// Total concentration used when a requested Beta variance is unreachable at
/// the drawn mean; moment matching would need nu <= 0 there.
const BETA_TINY_CONCENTRATION: f64 = 1e-3;

#[derive(Debug)]
pub enum Generator {
    Random {
        grid: SupportGrid,
    },
    Gaussian {
        grid: SupportGrid,
        var: f64,
    },
    VonMises {
        grid: SupportGrid,
        kappa: f64,
    },
    Beta {
        grid: SupportGrid,
        var: f64,
    },
    Skymap {
        grid: SupportGrid,
        sim: SkySimulator,
    },
}

impl Generator {
    pub fn random(size: usize) -> Self {
        Generator::Random {
            grid: SupportGrid::unit_interval(size),
        }
    }

    pub fn gaussian(size: usize, std: f64) -> Self {
        Generator::Gaussian {
            grid: SupportGrid::unit_interval(size),
            var: std * std,
        }
    }

    /// Circular analogue of `gaussian`: the spread parameter is mapped onto
    /// the circumference before inverting, kappa = 1 / (2 pi std)^2.
    pub fn von_mises(size: usize, std: f64) -> Self {
        let scaled = 2.0 * PI * std;
        Generator::VonMises {
            grid: SupportGrid::circle(size),
            kappa: 1.0 / (scaled * scaled),
        }
    }

    pub fn beta(size: usize, std: f64) -> Self {
        Generator::Beta {
            grid: SupportGrid::open_unit_interval(size),
            var: std * std,
        }
    }

    pub fn skymap(size: usize, sky: &SkyParams) -> Result<Self, String> {
        let sim = SkySimulator::new(&sky.ifos, sky.gps_start, sky.gps_end, sky.nside)?;
        Ok(Generator::Skymap {
            grid: SupportGrid::pixels(size),
            sim,
        })
    }

    /// Build the generator a validated run configuration asks for.
    pub fn from_config(cfg: &RunConfig) -> Result<Self, String> {
        match cfg.mode {
            Mode::Random => Ok(Self::random(cfg.size)),
            Mode::Gaussian => Ok(Self::gaussian(cfg.size, cfg.std)),
            Mode::VonMises => Ok(Self::von_mises(cfg.size, cfg.std)),
            Mode::Beta => Ok(Self::beta(cfg.size, cfg.std)),
            Mode::Skymap => {
                let sky = cfg
                    .sky
                    .as_ref()
                    .ok_or_else(|| "skymap mode requires detector configuration".to_string())?;
                Self::skymap(cfg.size, sky)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Generator::Random { .. } => Mode::Random,
            Generator::Gaussian { .. } => Mode::Gaussian,
            Generator::VonMises { .. } => Mode::VonMises,
            Generator::Beta { .. } => Mode::Beta,
            Generator::Skymap { .. } => Mode::Skymap,
        }
    }

    pub fn grid(&self) -> &SupportGrid {
        match self {
            Generator::Random { grid }
            | Generator::Gaussian { grid, .. }
            | Generator::VonMises { grid, .. }
            | Generator::Beta { grid, .. }
            | Generator::Skymap { grid, .. } => grid,
        }
    }

    /// Draw one single-event distribution.
    pub fn draw(&self, rng: &mut StdRng) -> Vec<f64> {
        let weights = match self {
            Generator::Random { grid } => {
                let cell = grid.cell();
                (0..grid.len())
                    .map(|_| rng.random_range(0.0..1.0f64) * cell)
                    .collect()
            }
            Generator::Gaussian { grid, var } => {
                let mean = rng.random_range(0.0..1.0f64);
                let coef = 1.0 / (2.0 * PI * var).sqrt();
                grid.points()
                    .iter()
                    .map(|&x| {
                        let d = x - mean;
                        coef * (-d * d / (2.0 * var)).exp() * grid.cell()
                    })
                    .collect()
            }
            Generator::VonMises { grid, kappa } => {
                let mean = rng.random_range(-PI..PI);
                let norm = 2.0 * PI * bessel_i0(*kappa);
                grid.points()
                    .iter()
                    .map(|&x| (kappa * (x - mean).cos()).exp() / norm * grid.cell())
                    .collect()
            }
            Generator::Beta { grid, var } => {
                let mean = rng.random_range(0.0..1.0f64);
                let cap = mean * (1.0 - mean);
                // Moment matching: var = m(1-m)/(nu+1). When the requested
                // variance reaches the cap the match has no positive
                // solution; fall back to a tiny total concentration at the
                // same mean instead of raising.
                let nu = if *var < cap {
                    cap / var - 1.0
                } else {
                    BETA_TINY_CONCENTRATION
                };
                let a = mean * nu;
                let b = (1.0 - mean) * nu;
                let ln_norm = ln_beta(a, b);
                grid.points()
                    .iter()
                    .map(|&x| {
                        let ln_p = (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln() - ln_norm;
                        ln_p.exp() * grid.cell()
                    })
                    .collect()
            }
            Generator::Skymap { grid, sim } => {
                let fine = sim.simulate(rng);
                downsample_mass(&fine, grid.len())
            }
        };
        self.grid().assert_weights_len(&weights);
        weights
    }
}
