// End-to-end rank behavior of the complexity sweep on the random family.

use clap::Parser;

use gpr_isotropy::cli::Args;
use gpr_isotropy::config::RunConfig;
use gpr_isotropy::core::generate::Generator;
use gpr_isotropy::sweep::{run_sweep, NullReporter};

fn config(argv: &[&str]) -> RunConfig {
    let mut full = vec!["investigate-complexity"];
    full.extend_from_slice(argv);
    RunConfig::from_args(&Args::parse_from(full)).unwrap()
}

#[test]
fn single_event_trials_have_rank_one() {
    // size=10, mode=random, Nevent range (1,5,1), 3 trials: with one event the
    // Fisher matrix is a single outer product, rank exactly 1.
    let cfg = config(&[
        "--size", "10", "--nevent-range", "1", "5", "1", "--ntrials", "3", "--seed", "1234",
    ]);
    let generator = Generator::from_config(&cfg).unwrap();
    let summary = run_sweep(&cfg, &generator, &mut NullReporter).unwrap();

    let first = &summary.per_nevent[0];
    assert_eq!(first.nevent, 1);
    for trial in &first.trials {
        assert_eq!(trial.rank, 1);
        assert!(trial.max_abs_eigenvalue > 0.0);
    }
}

#[test]
fn rank_saturates_at_size_for_random_events() {
    // With nevent >= size, random draws are linearly independent with high
    // probability, so the matrix reaches full rank under a fixed seed.
    let cfg = config(&[
        "--size", "10", "--nevent-range", "10", "31", "10", "--ntrials", "5", "--seed", "99",
    ]);
    let generator = Generator::from_config(&cfg).unwrap();
    let summary = run_sweep(&cfg, &generator, &mut NullReporter).unwrap();

    for per in &summary.per_nevent {
        for trial in &per.trials {
            assert_eq!(
                trial.rank, 10,
                "expected saturation at size for nevent={}",
                per.nevent
            );
        }
    }
}

#[test]
fn rank_never_exceeds_events_or_size() {
    let cfg = config(&[
        "--size", "8", "--nevent-range", "1", "20", "3", "--ntrials", "4", "--mode", "vonmises",
    ]);
    let generator = Generator::from_config(&cfg).unwrap();
    let summary = run_sweep(&cfg, &generator, &mut NullReporter).unwrap();

    for per in &summary.per_nevent {
        for trial in &per.trials {
            assert!(trial.rank <= per.nevent.min(8));
        }
    }
}

#[test]
fn rank_grows_one_per_event_below_size() {
    // Each random event contributes at most one to the rank, and for the
    // incoherent family it contributes exactly one until saturation.
    let cfg = config(&[
        "--size", "10", "--nevent-range", "1", "5", "1", "--ntrials", "3", "--seed", "7",
    ]);
    let generator = Generator::from_config(&cfg).unwrap();
    let summary = run_sweep(&cfg, &generator, &mut NullReporter).unwrap();

    for per in &summary.per_nevent {
        for trial in &per.trials {
            assert_eq!(trial.rank, per.nevent, "nevent={}", per.nevent);
        }
    }
}
