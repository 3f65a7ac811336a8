//! Monte-Carlo complexity study for gravitational-wave isotropy analysis.
//!
//! Repeatedly draws synthetic single-event "posterior" distributions over a
//! fixed support grid, accumulates them into a Fisher-information matrix, and
//! tracks how that matrix's rank and eigenvalue spectrum scale with the number
//! of events and the model family. The `investigate-complexity` binary drives
//! a sweep over event counts and trials and renders the summary reports.

pub mod cli;
pub mod config;
pub mod core;
pub mod report;
pub mod sweep;
