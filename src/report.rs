//! Reporting collaborator: plotters artifacts and summary persistence.
//!
//! Artifact names are deterministic:
//! `investigate-complexity{tag}-{kind}-size{size}[-nevent{n}][-trial{t}].png`
//! so a re-run with the same configuration overwrites the same files. The raw
//! sweep summary is additionally persisted as JSON and CSV so downstream
//! analysis never has to re-run the simulation.

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::core::grid::SupportGrid;
use crate::core::spectrum::{log10_excess, Spectrum};
use crate::core::stats::BoxStats;
use crate::sweep::{Reporter, SweepSummary};

pub fn artifact_name(
    tag: &str,
    kind: &str,
    size: usize,
    nevent: Option<usize>,
    trial: Option<usize>,
) -> String {
    let mut name = format!("investigate-complexity{tag}-{kind}-size{size}");
    if let Some(n) = nevent {
        name.push_str(&format!("-nevent{n}"));
    }
    if let Some(t) = trial {
        name.push_str(&format!("-trial{t}"));
    }
    name
}

/// Renders diagnostic and summary plots as the sweep progresses.
pub struct PlotReporter {
    out_dir: PathBuf,
    tag: String,
    size: usize,
    plot_single_events: bool,
    eigvals: bool,
    /// Reference line for the rank report; `None` for families whose rank
    /// scaling has no known asymptote.
    rank_asymptote: Option<f64>,
    /// log10 eigenvalue excesses accumulated across the current event
    /// count's trials.
    eigval_samples: Vec<f64>,
}

impl PlotReporter {
    pub fn new(cfg: &RunConfig) -> Self {
        let rank_asymptote = cfg
            .mode
            .has_rank_asymptote()
            .then_some(cfg.size as f64);
        Self {
            out_dir: cfg.output_dir.clone(),
            tag: cfg.tag.clone(),
            size: cfg.size,
            plot_single_events: cfg.plot_single_events,
            eigvals: cfg.eigvals,
            rank_asymptote,
            eigval_samples: Vec::new(),
        }
    }

    fn png_path(&self, kind: &str, nevent: Option<usize>, trial: Option<usize>) -> PathBuf {
        self.out_dir
            .join(artifact_name(&self.tag, kind, self.size, nevent, trial) + ".png")
    }
}

impl Reporter for PlotReporter {
    fn wants_events(&self) -> bool {
        self.plot_single_events
    }

    fn trial_events(
        &mut self,
        nevent: usize,
        trial: usize,
        grid: &SupportGrid,
        events: &[Vec<f64>],
    ) -> Result<(), Box<dyn Error>> {
        if !self.plot_single_events {
            return Ok(());
        }
        let path = self.png_path("events", Some(nevent), Some(trial));
        render_event_overlay(&path, grid, events)
    }

    fn trial_spectrum(
        &mut self,
        nevent: usize,
        _trial: usize,
        spectrum: &Spectrum,
    ) -> Result<(), Box<dyn Error>> {
        if self.eigvals {
            self.eigval_samples
                .extend(log10_excess(&spectrum.eigenvalues, nevent));
        }
        Ok(())
    }

    fn event_count_done(&mut self, nevent: usize) -> Result<(), Box<dyn Error>> {
        if !self.eigvals {
            return Ok(());
        }
        let samples = std::mem::take(&mut self.eigval_samples);
        if samples.is_empty() {
            return Ok(());
        }
        let path = self.png_path("eigvals", Some(nevent), None);
        render_eigval_histogram(&path, nevent, &samples)
    }

    fn sweep_done(&mut self, summary: &SweepSummary) -> Result<(), Box<dyn Error>> {
        let rank_path = self.png_path("rank", None, None);
        render_rank_report(&rank_path, summary, self.rank_asymptote)?;

        let maxeig_path = self.png_path("maxeig", None, None);
        render_maxeig_report(&maxeig_path, summary)?;

        let stem = artifact_name(&self.tag, "summary", self.size, None, None);
        fs::write(
            self.out_dir.join(stem.clone() + ".json"),
            serde_json::to_string_pretty(summary)?,
        )?;

        let mut csv = String::from("mode,size,nevent,trial,rank,max_abs_eigenvalue\n");
        for per in &summary.per_nevent {
            for (trial, result) in per.trials.iter().enumerate() {
                csv.push_str(&format!(
                    "{},{},{},{trial},{},{:.9e}\n",
                    summary.mode, summary.size, per.nevent, result.rank, result.max_abs_eigenvalue
                ));
            }
        }
        fs::write(self.out_dir.join(stem + ".csv"), csv)?;
        Ok(())
    }
}

fn render_event_overlay(
    out_path: &Path,
    grid: &SupportGrid,
    events: &[Vec<f64>],
) -> Result<(), Box<dyn Error>> {
    if events.is_empty() {
        return Ok(());
    }
    let x_min = grid.points().first().copied().unwrap_or(0.0);
    let x_max = grid.points().last().copied().unwrap_or(1.0).max(x_min + 1e-9);
    let y_max = events
        .iter()
        .flat_map(|e| e.iter().copied())
        .fold(0.0f64, f64::max)
        .max(1e-12)
        * 1.1;

    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Single-event distributions ({} events)", events.len()),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("support")
        .y_desc("weight")
        .draw()?;

    for (i, event) in events.iter().enumerate() {
        let series = grid.points().iter().copied().zip(event.iter().copied());
        chart.draw_series(LineSeries::new(series, &Palette99::pick(i)))?;
    }

    root.present()?;
    Ok(())
}

fn render_eigval_histogram(
    out_path: &Path,
    nevent: usize,
    samples: &[f64],
) -> Result<(), Box<dyn Error>> {
    let lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return Ok(());
    }
    let span = (hi - lo).max(1e-6);
    let bin_width = span / 40.0;
    let counts = histogram_counts(samples, lo, hi, bin_width);
    let y_max = counts
        .iter()
        .map(|(_, count)| *count as f64)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Eigenvalue spectrum vs per-event scaling (nevent = {nevent})"),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..(lo + span * 1.001), 0.0f64..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("log10 |eigenvalue| - log10 nevent")
        .y_desc("count")
        .draw()?;

    for (bin_start, count) in counts {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(bin_start, 0.0), (bin_start + bin_width, count as f64)],
            BLUE.mix(0.6).filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn render_rank_report(
    out_path: &Path,
    summary: &SweepSummary,
    asymptote: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    let x_max = summary
        .per_nevent
        .last()
        .map(|s| s.nevent as f64)
        .unwrap_or(1.0)
        * 1.05;
    let y_max = summary.size as f64 * 1.15;

    let root = BitMapBackend::new(out_path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Fisher matrix rank vs event count ({}, size = {})",
                summary.mode, summary.size
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..x_max, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Nevent")
        .y_desc("rank")
        .draw()?;

    if let Some(level) = asymptote {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, level), (x_max, level)],
                BLACK.mix(0.3),
            )))?
            .label("rank = size")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.3)));
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    draw_box_series(
        &mut chart,
        summary.per_nevent.iter().map(|per| {
            (per.nevent as f64, BoxStats::from_values(&per.ranks()))
        }),
        half_box_width(summary),
        &BLUE,
    )?;

    root.present()?;
    Ok(())
}

fn render_maxeig_report(out_path: &Path, summary: &SweepSummary) -> Result<(), Box<dyn Error>> {
    let x_max = summary
        .per_nevent
        .last()
        .map(|s| s.nevent as f64)
        .unwrap_or(1.0)
        * 1.05;
    let y_max = summary
        .per_nevent
        .iter()
        .flat_map(|per| per.trials.iter().map(|t| t.max_abs_eigenvalue))
        .fold(0.0f64, f64::max)
        .max(1e-12)
        * 1.1;

    let root = BitMapBackend::new(out_path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Max |eigenvalue| vs event count ({}, size = {})",
                summary.mode, summary.size
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0f64..x_max, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Nevent")
        .y_desc("max |eigenvalue|")
        .draw()?;

    draw_box_series(
        &mut chart,
        summary.per_nevent.iter().map(|per| {
            (
                per.nevent as f64,
                BoxStats::from_values(&per.max_eigenvalues()),
            )
        }),
        half_box_width(summary),
        &RED,
    )?;

    root.present()?;
    Ok(())
}

fn half_box_width(summary: &SweepSummary) -> f64 {
    let step = summary
        .per_nevent
        .windows(2)
        .map(|w| (w[1].nevent - w[0].nevent) as f64)
        .next()
        .unwrap_or(1.0);
    (step * 0.3).max(0.3)
}

/// Box-plot glyphs: IQR rectangle, median tick, min-max whisker.
fn draw_box_series<DB, I>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    boxes: I,
    half_width: f64,
    color: &RGBColor,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    I: Iterator<Item = (f64, Option<BoxStats>)>,
{
    for (x, stats) in boxes {
        let Some(stats) = stats else { continue };
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, stats.min), (x, stats.max)],
            color.mix(0.5),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half_width, stats.q1), (x + half_width, stats.q3)],
            color.mix(0.35).filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - half_width, stats.median), (x + half_width, stats.median)],
            color.stroke_width(2),
        )))?;
    }
    Ok(())
}

fn histogram_counts(values: &[f64], min: f64, max: f64, bin_width: f64) -> Vec<(f64, usize)> {
    if bin_width <= 0.0 {
        return Vec::new();
    }
    let bins = ((max - min) / bin_width).ceil().max(1.0) as usize;
    let mut counts = vec![0usize; bins];
    for &value in values {
        if value < min || value > max {
            continue;
        }
        let idx = (((value - min) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (0..bins)
        .map(|i| (min + i as f64 * bin_width, counts[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_are_deterministic() {
        assert_eq!(
            artifact_name("", "rank", 50, None, None),
            "investigate-complexity-rank-size50"
        );
        assert_eq!(
            artifact_name("-run2", "eigvals", 50, Some(41), None),
            "investigate-complexity-run2-eigvals-size50-nevent41"
        );
        assert_eq!(
            artifact_name("", "events", 10, Some(3), Some(7)),
            "investigate-complexity-events-size10-nevent3-trial7"
        );
    }

    #[test]
    fn histogram_counts_cover_all_in_range_values() {
        let values = [0.05, 0.15, 0.15, 0.95, 2.0];
        let counts = histogram_counts(&values, 0.0, 1.0, 0.1);
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 4, "out-of-range value should be dropped");
        assert_eq!(counts[1].1, 2);
    }

    #[test]
    fn histogram_upper_edge_lands_in_last_bin() {
        let counts = histogram_counts(&[1.0], 0.0, 1.0, 0.1);
        assert_eq!(counts.last().unwrap().1, 1);
    }
}
