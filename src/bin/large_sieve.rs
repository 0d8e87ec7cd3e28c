use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use num_bigint::BigUint;
use tracing::level_filters::LevelFilter;
use tracing::{event, Level};
use tracing_forest::printer::PrettyPrinter;
use tracing_forest::ForestLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use gapsieve::{
    compute_sieve_limit, count_survivors, expected_survivors, parse_anchor, survivors, BitVec,
    IntervalSieve, PrimeSourceKind, PrimorialForm, SearchBounds, SieveConfig, SieveOutcome,
};

/// Sieve a window of large integers and print the numbers that still need a primality test.
#[derive(Parser)]
#[command(name = "large_sieve", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    sieve: SieveArgs,
}

#[derive(Args)]
struct SieveArgs {
    /// TOML file with `max_gap`, `max_limit`, `max_marks_bytes` and `prime_source`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prime generator to sieve with, overriding the config file
    #[arg(long, global = true)]
    prime_source: Option<PrimeSourceKind>,

    /// Largest prime to sieve with; estimated from the size of the window when omitted
    #[arg(long, global = true)]
    limit: Option<u64>,

    /// Split the window into this many sub-windows sieved in parallel
    #[arg(long, global = true, default_value_t = 1)]
    jobs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Sieve [m * p# / d + a, m * p# / d + a + gap], printing `m * p# / d + k` per survivor
    #[command(allow_negative_numbers = true)]
    Primorial {
        m: u64,
        p: u64,
        d: u64,
        a: i64,
        gap: u64,
    },
    /// Sieve [start, start + gap], printing each survivor in decimal
    Interval { start: String, gap: u64 },
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // Survivors go to stdout; everything else to stderr.
    Registry::default()
        .with(env_filter)
        .with(ForestLayer::from(PrettyPrinter::new().writer(io::stderr)))
        .init();

    let cli = Cli::parse();
    let sieve = IntervalSieve::new(load_config(&cli.sieve)?)?;

    match cli.command {
        Command::Primorial { m, p, d, a, gap } => {
            SearchBounds::default().check(m, p, a, gap)?;
            let form = PrimorialForm::new(m, p, d, a)?;
            event!(
                Level::INFO,
                "sieving {} * {}# / {} + [{}, {}]",
                m,
                p,
                d,
                a,
                a + gap as i64
            );
            let n = form.anchor()?;
            let outcome = run(&sieve, &cli.sieve, &n, gap)?;

            let mut out = BufWriter::new(io::stdout().lock());
            for offset in survivors(&outcome.marks) {
                writeln!(out, "{}", form.label(a + offset as i64))?;
            }
            out.flush()?;
        }
        Command::Interval { start, gap } => {
            let n = parse_anchor(&start)?;
            event!(Level::INFO, "sieving {} + [0, {}]", start.trim(), gap);
            let outcome = run(&sieve, &cli.sieve, &n, gap)?;

            let mut out = BufWriter::new(io::stdout().lock());
            for offset in survivors(&outcome.marks) {
                writeln!(out, "{}", &n + offset)?;
            }
            out.flush()?;
        }
    }
    Ok(())
}

fn load_config(args: &SieveArgs) -> Result<SieveConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SieveConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SieveConfig::default(),
    };
    if let Some(kind) = args.prime_source {
        config.prime_source = kind;
    }
    Ok(config)
}

fn run(
    sieve: &IntervalSieve,
    args: &SieveArgs,
    n: &BigUint,
    gap: u64,
) -> Result<SieveOutcome<BitVec>> {
    let limit = match args.limit {
        Some(limit) => limit,
        None => compute_sieve_limit(n.bits().max(1) as f64, gap)?,
    };
    event!(
        Level::INFO,
        "bits: {}  gap: {}  limit: {}",
        n.bits(),
        gap,
        limit
    );
    event!(
        Level::INFO,
        "expect ~{:.0} remaining",
        expected_survivors(gap, limit)
    );

    let outcome = if args.jobs > 1 {
        let chunk_len = (gap + 1).div_ceil(args.jobs);
        sieve.sieve_parallel(n, gap, limit, chunk_len)?
    } else {
        sieve.composites(n, gap, limit)?
    };

    let total = outcome.marks.len();
    let remaining = count_survivors(&outcome.marks);
    let composite = total - remaining;
    event!(
        Level::INFO,
        "{} / {} = {:.2}% composite, {} remaining (primes {}, limit {})",
        composite,
        total,
        100.0 * composite as f64 / total as f64,
        remaining,
        outcome.primes_used,
        outcome.limit
    );
    Ok(outcome)
}
