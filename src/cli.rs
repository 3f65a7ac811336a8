use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "investigate-complexity", author, version, about)]
pub struct Args {
    /// Support grid resolution (number of sample points per distribution)
    #[arg(long, default_value_t = 50)]
    pub size: usize,

    /// Event-count sweep as START STOP STEP (STOP exclusive)
    #[arg(long = "nevent-range", num_args = 3, value_names = ["START", "STOP", "STEP"],
          default_values_t = vec![1, 1000, 10])]
    pub nevent_range: Vec<usize>,

    /// Independent trials per event count
    #[arg(long = "ntrials", default_value_t = 100)]
    pub ntrials: usize,

    /// Model family: random | gaussian | vonmises | beta | skymap
    #[arg(long, default_value = "random")]
    pub mode: String,

    /// Spread parameter for the bump families
    #[arg(long, default_value_t = 0.1)]
    pub std: f64,

    /// Detector to include in the skymap simulation (repeatable)
    #[arg(long = "ifo")]
    pub ifos: Vec<String>,

    /// GPS time range START END for skymap event times
    #[arg(long = "gps-range", num_args = 2, value_names = ["START", "END"],
          default_values_t = vec![1_126_051_217.0, 1_137_254_417.0])]
    pub gps_range: Vec<f64>,

    /// Working sky-map resolution (npix = 12 * nside^2) before downsampling
    #[arg(long, default_value_t = 64)]
    pub nside: u32,

    /// Render each trial's drawn distributions as an overlay plot
    #[arg(long, default_value_t = false)]
    pub plot_single_events: bool,

    /// Render per-event-count eigenvalue histograms
    #[arg(long, default_value_t = false)]
    pub eigvals: bool,

    /// Directory for plots and summary files
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: String,

    /// Suffix inserted into every output filename (e.g. "-run2")
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub tag: String,

    /// Base seed for the per-trial random number generators
    #[arg(long, default_value_t = 0xC0FFEE)]
    pub seed: u64,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
