//! Fitting Binary
//!
//! Loads every variable named in a list file, fits the mixture, and writes
//! the report as JSON.
//!
//! Type "Q" + Enter, or set FIT_DURATION, to stop after the current step.

use clap::Parser;
use std::path::PathBuf;
use varmix::fitting::*;
use varmix::store::*;
use varmix::*;

#[derive(Debug, Parser)]
#[command(name = "fit", about = "Fit a per-cluster mixture of Gaussians to variable observations")]
struct Args {
    /// Line-delimited list of variable names (commas separate path segments)
    #[arg(long)]
    names: PathBuf,
    /// Directory holding one <name>.csv per variable
    #[arg(long)]
    root: PathBuf,
    /// Copy every file read into this directory
    #[arg(long)]
    archive: Option<PathBuf>,
    /// Where to write the JSON report
    #[arg(long, default_value = "report.json")]
    output: PathBuf,
    #[arg(long, default_value_t = CLUSTER_COUNT)]
    clusters: usize,
    #[arg(long, default_value_t = COMPONENT_COUNT)]
    components: usize,
    #[arg(long, default_value_t = SAMPLE_SIZE)]
    sample: usize,
    #[arg(long, default_value_t = MAX_ITERATION)]
    iterations: usize,
    /// Stop once the total score changes by less than this between iterations
    #[arg(long)]
    tolerance: Option<f64>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            clusters: args.clusters,
            components: args.components,
            sample: args.sample,
            iterations: args.iterations,
            tolerance: args.tolerance,
            seed: args.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let ref args = Args::parse();
    log();
    brb();
    let config = Config::from(args);
    let names = names(&args.names)?;
    let source = match args.archive {
        Some(ref archive) => Directory::new(&args.root).archive(archive),
        None => Directory::new(&args.root),
    };
    let ref store = Store::load(&source, &names)?;
    let report = Driver::new(store, config)?.fit(config.termination());
    report.save(&args.output)
}
