// Configuration failures must surface before any simulation runs.

use clap::Parser;

use gpr_isotropy::cli::Args;
use gpr_isotropy::config::RunConfig;
use gpr_isotropy::core::generate::Generator;

fn try_config(argv: &[&str]) -> Result<RunConfig, String> {
    let mut full = vec!["investigate-complexity"];
    full.extend_from_slice(argv);
    RunConfig::from_args(&Args::parse_from(full))
}

#[test]
fn skymap_without_detectors_fails_before_sampling() {
    let err = try_config(&["--mode", "skymap"]).unwrap_err();
    assert!(err.contains("--ifo"), "unexpected message: {err}");
}

#[test]
fn unknown_mode_fails_with_the_known_list() {
    let err = try_config(&["--mode", "lognormal"]).unwrap_err();
    for known in ["random", "gaussian", "vonmises", "beta", "skymap"] {
        assert!(err.contains(known), "message should list '{known}': {err}");
    }
}

#[test]
fn unknown_detector_fails_at_generator_construction() {
    let cfg = try_config(&["--mode", "skymap", "--ifo", "ZZ"]).unwrap();
    let err = Generator::from_config(&cfg).unwrap_err();
    assert!(err.contains("unknown detector 'ZZ'"), "{err}");
}

#[test]
fn inverted_gps_range_rejected() {
    let err = try_config(&[
        "--mode", "skymap", "--ifo", "H1", "--gps-range", "100.0", "50.0",
    ])
    .unwrap_err();
    assert!(err.contains("--gps-range"), "{err}");
}

#[test]
fn wrong_nevent_range_arity_is_a_cli_error() {
    // clap enforces the three-value arity before validation even starts.
    let parsed = Args::try_parse_from(["investigate-complexity", "--nevent-range", "1", "10"]);
    assert!(parsed.is_err());
}

#[test]
fn valid_skymap_configuration_reaches_a_generator() {
    let cfg = try_config(&[
        "--mode", "skymap", "--ifo", "H1", "--ifo", "L1", "--ifo", "V1", "--nside", "4",
    ])
    .unwrap();
    let generator = Generator::from_config(&cfg).unwrap();
    assert_eq!(generator.grid().len(), cfg.size);
}
