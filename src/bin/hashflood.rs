//! hashflood: time hash-table insertion under adversarial keys.
//!
//! With no arguments, reproduces the reference run:
//!
//! ```bash
//! hashflood
//! # x = 107897: 0.031 seconds, sum = 2666686666700000
//! # x = 126271: 0.029 seconds, sum = 2666686666700000
//! ```
//!
//! Compare every strategy against a multiplier derived from the table's own
//! growth schedule:
//!
//! ```bash
//! hashflood --all-strategies --attack --stats
//! ```

use clap::{ArgAction, Parser};
use hashflood::hash::init_process_seed;
use hashflood::{
    Backend, BenchConfig, BucketPolicy, HashStrategy, SeedSource, WorkloadReport,
    adversarial_multiplier, install_process_seed, process_seed,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hashflood",
    version,
    about = "Hash-flooding micro-benchmark",
    long_about = "Inserts (i * x, i) for i = 1..=N into a hash table and times it.\n\n\
        Identity and seeded-identity hashes collapse when x is a multiple of the\n\
        bucket count; the SplitMix64-mixed hash keeps insertion linear."
)]
struct Cli {
    /// Load settings from a TOML file; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Insertions per run
    #[arg(short = 'n', long)]
    iterations: Option<u64>,

    /// Key multiplier (repeatable)
    #[arg(short = 'x', long = "multiplier", action = ArgAction::Append)]
    multipliers: Vec<u64>,

    /// Hash strategy: identity, seeded-identity, seeded-avalanche (repeatable)
    #[arg(short, long = "strategy", action = ArgAction::Append)]
    strategies: Vec<HashStrategy>,

    /// Run every strategy
    #[arg(long, conflicts_with = "strategies")]
    all_strategies: bool,

    /// Table implementation: chained, hashbrown
    #[arg(long)]
    backend: Option<Backend>,

    /// Bucket policy of the chained table: prime, power-of-two
    #[arg(long)]
    policy: Option<BucketPolicy>,

    /// Initial bucket count of the chained table
    #[arg(long)]
    initial_buckets: Option<usize>,

    /// Max load factor of the chained table (`inf` disables growth)
    #[arg(long)]
    max_load_factor: Option<f64>,

    /// Use a multiplier that floods the chained table instead of --multiplier
    #[arg(long, conflicts_with = "multipliers")]
    attack: bool,

    /// Fix the process seed
    #[arg(long)]
    seed: Option<u64>,

    /// Seed source when no seed is fixed: clock, os
    #[arg(long)]
    seed_source: Option<SeedSource>,

    /// Print the process seed after the runs
    #[arg(long)]
    show_seed: bool,

    /// Print bucket occupancy after each run
    #[arg(long)]
    stats: bool,

    /// Emit one JSON object per run
    #[arg(long)]
    json: bool,

    /// Raise log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "hashflood=debug",
        _ => "hashflood=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> hashflood::Result<BenchConfig> {
    let mut config = match &cli.config {
        #[cfg(feature = "config-file")]
        Some(path) => BenchConfig::from_file(path)?,
        #[cfg(not(feature = "config-file"))]
        Some(path) => {
            return Err(hashflood::Error::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("{} ignored: built without config-file", path.display()),
            )));
        }
        None => BenchConfig::default(),
    };

    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if !cli.multipliers.is_empty() {
        config.multipliers.clone_from(&cli.multipliers);
    }
    if cli.all_strategies {
        config.strategies = HashStrategy::ALL.to_vec();
    } else if !cli.strategies.is_empty() {
        config.strategies.clone_from(&cli.strategies);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(policy) = cli.policy {
        config.table.policy = policy;
    }
    if let Some(buckets) = cli.initial_buckets {
        config.table.initial_buckets = buckets;
    }
    if let Some(load) = cli.max_load_factor {
        config.table.max_load_factor = load;
    }
    if let Some(seed) = cli.seed {
        config.seed.value = Some(seed);
    }
    if let Some(source) = cli.seed_source {
        config.seed.source = source;
    }
    config.validate()?;

    if cli.attack {
        let m = adversarial_multiplier(config.iterations, &config.table);
        tracing::info!(multiplier = m, "derived adversarial multiplier");
        config.multipliers = vec![m];
    }
    Ok(config)
}

fn format_report(report: &WorkloadReport, labelled: bool, cli: &Cli) -> hashflood::Result<String> {
    if cli.json {
        return serde_json::to_string(report).map_err(|err| {
            tracing::error!(%err, multiplier = report.multiplier, "failed to encode report");
            err.into()
        });
    }
    let mut out = if labelled {
        format!("{} - {report}", report.strategy)
    } else {
        report.to_string()
    };
    if cli.stats {
        if let Some(stats) = report.bucket_stats {
            out.push_str(&format!(
                "\n  buckets = {}, max bucket = {}, empty = {}, skew = {:.1}, probes = {}",
                stats.bucket_count,
                stats.max_bucket,
                stats.empty_buckets,
                stats.skew(),
                report.probes.unwrap_or(0)
            ));
        }
    }
    Ok(out)
}

fn run(cli: &Cli) -> hashflood::Result<()> {
    let config = load_config(cli)?;

    match config.seed.value {
        Some(seed) => install_process_seed(seed)?,
        // The clock seed stays lazy until the first seeded digest.
        None if config.seed.source == SeedSource::Os => {
            init_process_seed(SeedSource::Os);
        }
        None => {}
    }

    let labelled = config.strategies.len() > 1;
    for workload in config.workloads()? {
        let report = workload.run()?;
        if !report.matches_expected_aggregate() {
            tracing::warn!(
                multiplier = report.multiplier,
                iterations = report.iterations,
                "keys wrapped past u64::MAX; aggregate differs from N(N+1)(2N+1)/6"
            );
        }
        println!("{}", format_report(&report, labelled, cli)?);
    }

    if cli.show_seed {
        println!("seed = {:#018x}", process_seed());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
