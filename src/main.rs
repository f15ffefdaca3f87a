// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Command line driver: score every generator across seeds and print the tables.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use rqsbench::config::{DEFAULT_LAGS, DEFAULT_SAMPLE_COUNT, DEFAULT_SEEDS};
use rqsbench::rngs::{self, Generator};
use rqsbench::stats::DEFAULT_BUCKETS;
use rqsbench::{report, run_benchmark, utils, BenchmarkConfig, RqsError};

#[derive(Parser)]
#[command(name = "rqsbench")]
#[command(about = "Score PRNG output with the Randomness Quality Score")]
#[command(version)]
struct Cli {
    /// Samples drawn per run
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Histogram buckets for the entropy and chi-square tests
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// Comma-separated autocorrelation lags
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_LAGS)]
    lags: Vec<usize>,

    /// Comma-separated seeds, one run per seed
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SEEDS)]
    seeds: Vec<u64>,

    /// Comma-separated generator names to run (default: all)
    #[arg(long, value_delimiter = ',')]
    generators: Vec<String>,

    /// Also score the constant and alternating test generators
    #[arg(long)]
    with_degenerate: bool,

    /// Summary table only
    #[arg(long)]
    quiet: bool,

    /// Worker threads (default: one per core)
    #[arg(long)]
    jobs: Option<usize>,

    /// Print a JSON report instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the report to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn select_generators(cli: &Cli) -> Result<Vec<Generator>, RqsError> {
    let mut all = rngs::default_generators();
    if cli.with_degenerate {
        all.extend(rngs::degenerate_generators());
    }
    if cli.generators.is_empty() {
        return Ok(all);
    }
    let mut selected = Vec::with_capacity(cli.generators.len());
    for wanted in &cli.generators {
        match all.iter().find(|g| g.name().eq_ignore_ascii_case(wanted)) {
            Some(generator) => selected.push(*generator),
            None => {
                return Err(RqsError::InvalidInput(format!(
                    "unknown generator `{wanted}`"
                )))
            }
        }
    }
    Ok(selected)
}

fn run(cli: Cli) -> Result<(), RqsError> {
    let generators = select_generators(&cli)?;
    let config = BenchmarkConfig {
        sample_count: cli.samples,
        buckets: cli.buckets,
        lags: cli.lags,
        seeds: cli.seeds,
        verbose: !cli.quiet,
        jobs: cli.jobs,
    };
    let generated_at = chrono::Local::now();
    let start = std::time::Instant::now();
    let summaries = run_benchmark(&generators, &config)?;
    info!(
        "Full program runtime: {}",
        utils::format_elapsed_time(start.elapsed())
    );

    let text = if cli.json {
        report::render_json(&summaries, &config, &generated_at)?
    } else {
        report::render_text(&summaries, &config, &generated_at)
    };
    println!("{text}");
    if let Some(path) = &cli.output {
        utils::write_report(path, &text)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
