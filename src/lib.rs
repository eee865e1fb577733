//! Per-cluster mixture of univariate Gaussians.
//!
//! Every observed variable is assigned to exactly one of `K` clusters, and
//! within that cluster each of its distinct values is explained by one of `C`
//! Gaussian components. Parameters are estimated by alternating an assignment
//! step and a re-estimation step over the full variable set.
//!
//! ## Pipeline
//!
//! 1. **Load** — [`store::Store`] reads one observation file per variable
//! 2. **Seed** — [`mixture::Mixture::seed`] draws initial Gaussians from the data
//! 3. **Fit** — [`fitting::Driver`] alternates E-steps and M-steps under a [`fitting::Policy`]
//! 4. **Report** — [`fitting::Report`] captures the final tables
#![allow(dead_code)]

pub mod fitting;
pub mod mixture;
pub mod store;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Natural-log density of an observation under a Gaussian, and sums thereof.
pub type Likelihood = f64;
/// Natural-log probability mass of a cluster or a component.
pub type Prior = f64;

// ============================================================================
// MIXTURE SHAPE
// ============================================================================
/// Number of clusters variables are partitioned into.
pub const CLUSTER_COUNT: usize = 12;
/// Number of Gaussian components inside each cluster.
pub const COMPONENT_COUNT: usize = 3;
/// Iteration bound for the default stopping policy.
pub const MAX_ITERATION: usize = 1000;

// ============================================================================
// SAMPLING
// Seeding and resampling draw SAMPLE_SIZE values from one of three pools.
// ============================================================================
/// Draws per random sample.
pub const SAMPLE_SIZE: usize = 1000;
/// Relative weight of the low-extreme pool.
pub const SAMPLE_WEIGHT_LOW: u32 = 1;
/// Relative weight of the high-extreme pool.
pub const SAMPLE_WEIGHT_HIGH: u32 = 1;
/// Relative weight of the generic (variable, observation) pool.
pub const SAMPLE_WEIGHT_POOL: u32 = 3;
/// Redraws allowed when a sample has no spread before flooring its variance.
pub const RESAMPLE_ATTEMPTS: usize = 64;
/// Smallest variance ever assigned to a component.
pub const VARIANCE_FLOOR: f64 = 1e-12;

// ============================================================================
// LOADING
// ============================================================================
/// Capacity of each extreme-value pool.
pub const EXTREME_CAPACITY: usize = 10_000;
/// Variables with more distinct values than this are excluded.
pub const UNIQUE_LIMIT: usize = 200;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Global interrupt flag for graceful shutdown at step boundaries.
#[cfg(feature = "cli")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Optional fitting deadline from FIT_DURATION env var.
#[cfg(feature = "cli")]
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
/// Check if graceful shutdown was requested (via stdin "Q") or deadline reached.
#[cfg(feature = "cli")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
        || DEADLINE
            .get()
            .map_or(false, |d| std::time::Instant::now() >= *d)
}
/// No-op interrupt check when cli feature disabled.
#[cfg(not(feature = "cli"))]
pub fn interrupted() -> bool {
    false
}
/// Register graceful interrupt handler. Type "Q" + Enter to stop after the current step.
/// Optionally set FIT_DURATION env var (e.g., "2h", "30m") for timed runs.
#[cfg(feature = "cli")]
pub fn brb() {
    if let Ok(duration) = std::env::var("FIT_DURATION") {
        if let Some(deadline) = parse_duration(&duration) {
            let _ = DEADLINE.set(std::time::Instant::now() + deadline);
            log::info!("fitting will stop after {}", duration);
        }
    }
    std::thread::spawn(|| {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().to_uppercase() == "Q" => {
                    log::warn!("graceful interrupt requested, finishing current step...");
                    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
            }
        }
    });
}
/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
#[cfg(feature = "cli")]
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}
