// Entry point for the complexity investigation: validate configuration,
// run the sweep, render the summary reports.

use clap::Parser;
use std::error::Error;
use std::fs::create_dir_all;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gpr_isotropy::cli::Args;
use gpr_isotropy::config::RunConfig;
use gpr_isotropy::core::generate::Generator;
use gpr_isotropy::report::PlotReporter;
use gpr_isotropy::sweep::run_sweep;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // All configuration problems abort here, before any simulation runs.
    let cfg = match RunConfig::from_args(&args) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("configuration error: {message}");
            process::exit(1);
        }
    };
    let generator = match Generator::from_config(&cfg) {
        Ok(generator) => generator,
        Err(message) => {
            eprintln!("configuration error: {message}");
            process::exit(1);
        }
    };

    create_dir_all(&cfg.output_dir)?;
    cfg.write_toml(&cfg.output_dir)?;

    info!(
        mode = %cfg.mode,
        size = cfg.size,
        ntrials = cfg.ntrials,
        seed = cfg.seed,
        "starting complexity sweep"
    );

    let mut reporter = PlotReporter::new(&cfg);
    let summary = run_sweep(&cfg, &generator, &mut reporter)?;

    info!(
        event_counts = summary.per_nevent.len(),
        output_dir = %cfg.output_dir.display(),
        "sweep complete"
    );
    Ok(())
}
