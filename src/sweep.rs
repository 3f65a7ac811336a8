//! Trial/sweep driver.
//!
//! For each configured event count and each trial: zero the Fisher matrix,
//! draw the trial's events, accumulate, analyze, record. The driver owns the
//! seeding contract: every trial gets its own `StdRng` derived from the base
//! seed and the (event count, trial) pair, so any single trial can be
//! reproduced in isolation and trials are independent by construction. The
//! sweep itself runs strictly sequentially.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{debug, info};

use crate::config::{Mode, RunConfig};
use crate::core::fisher::FisherMatrix;
use crate::core::generate::Generator;
use crate::core::grid::SupportGrid;
use crate::core::spectrum::{self, Spectrum};

/// Outcome of one draw-and-accumulate cycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrialResult {
    pub rank: usize,
    pub max_abs_eigenvalue: f64,
}

/// Ordered trial results for one event count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventCountSummary {
    pub nevent: usize,
    pub trials: Vec<TrialResult>,
}

impl EventCountSummary {
    pub fn ranks(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.rank as f64).collect()
    }

    pub fn max_eigenvalues(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.max_abs_eigenvalue).collect()
    }
}

/// Everything one sweep produced, in event-count order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepSummary {
    pub mode: Mode,
    pub size: usize,
    pub ntrials: usize,
    pub seed: u64,
    pub per_nevent: Vec<EventCountSummary>,
}

/// Reporting collaborator. The driver calls these hooks as the sweep
/// progresses; the simulation core itself has no graphics dependency.
pub trait Reporter {
    /// Whether the driver should keep each trial's drawn event vectors
    /// around for `trial_events`. Off by default; the driver streams
    /// events straight into the accumulator otherwise.
    fn wants_events(&self) -> bool {
        false
    }

    fn trial_events(
        &mut self,
        _nevent: usize,
        _trial: usize,
        _grid: &SupportGrid,
        _events: &[Vec<f64>],
    ) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn trial_spectrum(
        &mut self,
        _nevent: usize,
        _trial: usize,
        _spectrum: &Spectrum,
    ) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn event_count_done(&mut self, _nevent: usize) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn sweep_done(&mut self, _summary: &SweepSummary) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Reporter that does nothing; keeps the driver testable headless.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Derive the RNG seed for one trial (splitmix64 finalizer over the base
/// seed and the trial coordinates).
pub fn trial_seed(base: u64, nevent: usize, trial: usize) -> u64 {
    let mut z = base
        ^ (nevent as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (trial as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run the full sweep: event_count x trial x event, sequentially.
pub fn run_sweep(
    cfg: &RunConfig,
    generator: &Generator,
    reporter: &mut dyn Reporter,
) -> Result<SweepSummary, Box<dyn Error>> {
    let mut fisher = FisherMatrix::zeros(cfg.size);
    let mut per_nevent = Vec::with_capacity(cfg.nevent_range.len());

    for nevent in cfg.nevent_range.iter() {
        info!(nevent, ntrials = cfg.ntrials, "sweeping event count");
        let mut trials = Vec::with_capacity(cfg.ntrials);

        for trial in 0..cfg.ntrials {
            let mut rng = StdRng::seed_from_u64(trial_seed(cfg.seed, nevent, trial));
            fisher.reset();

            if reporter.wants_events() {
                let events: Vec<Vec<f64>> =
                    (0..nevent).map(|_| generator.draw(&mut rng)).collect();
                for event in &events {
                    fisher.accumulate(event);
                }
                reporter.trial_events(nevent, trial, generator.grid(), &events)?;
            } else {
                for _ in 0..nevent {
                    let event = generator.draw(&mut rng);
                    fisher.accumulate(&event);
                }
            }

            let spectrum = spectrum::analyze(&fisher);
            debug!(
                nevent,
                trial,
                rank = spectrum.rank,
                max_abs = spectrum.max_abs,
                "trial analyzed"
            );
            reporter.trial_spectrum(nevent, trial, &spectrum)?;
            trials.push(TrialResult {
                rank: spectrum.rank,
                max_abs_eigenvalue: spectrum.max_abs,
            });
        }

        reporter.event_count_done(nevent)?;
        per_nevent.push(EventCountSummary { nevent, trials });
    }

    let summary = SweepSummary {
        mode: generator.mode(),
        size: cfg.size,
        ntrials: cfg.ntrials,
        seed: cfg.seed,
        per_nevent,
    };
    reporter.sweep_done(&summary)?;
    Ok(summary)
}
