// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Statistical testing of an RNGs output.
//!
//! Every (generator, seed) pair is an independent job: sample, normalize,
//! run the four tests and score. Jobs run on a rayon pool and are gathered
//! back in submission order.

use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::conditioning;
use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::rngs::Generator;
use crate::score::{aggregate_score, ScoreRecord};
use crate::stats::{self, AutocorrelationResult, ChiSquareResult, RunsResult};

/// Every statistic computed for one sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleMetrics {
    pub entropy_bits: f64,
    pub normalized_entropy: f64,
    pub chi_square: ChiSquareResult,
    pub autocorrelation: Vec<AutocorrelationResult>,
    pub runs: RunsResult,
    pub score: ScoreRecord,
}

impl SampleMetrics {
    pub fn rqs(&self) -> f64 {
        self.score.rqs
    }

    pub fn p_chi(&self) -> f64 {
        self.chi_square.p_value
    }

    pub fn p_runs(&self) -> f64 {
        self.runs.p_value
    }
}

/// One scored run of a generator.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    /// Seed for seeded generators, `Run i` for entropy sources.
    pub label: String,
    pub seed: Option<u64>,
    pub metrics: SampleMetrics,
    #[serde(skip)]
    pub time_used: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratorSummary {
    pub name: String,
    pub seeded: bool,
    pub rqs_mean: f64,
    /// Population standard deviation over runs.
    pub rqs_std: f64,
    pub runs: Vec<RunMetrics>,
}

/// Full pipeline for one sample sequence:
/// normalize, histogram entropy, chi squared, autocorrelation per lag, runs, score.
pub fn compute_metrics(samples: &[u32], buckets: usize, lags: &[usize]) -> Result<SampleMetrics> {
    let u = conditioning::normalize(samples)?;
    let histogram = stats::histogram(&u, buckets)?;
    let normalized_entropy = histogram.normalized_entropy();
    let chi_square = stats::chi_square_uniformity(&histogram.counts);
    let autocorrelation = stats::autocorrelation_lags(&u, lags);
    let runs = stats::runs_test(&u);

    let p_lags: Vec<f64> = autocorrelation.iter().map(|r| r.p_value).collect();
    let score = aggregate_score(
        normalized_entropy,
        chi_square.p_value,
        &p_lags,
        runs.p_value,
    );
    Ok(SampleMetrics {
        entropy_bits: histogram.entropy_bits,
        normalized_entropy,
        chi_square,
        autocorrelation,
        runs,
        score,
    })
}

/// Generate and score a single run.
fn run_single_test(
    generator: &Generator,
    config: &BenchmarkConfig,
    slot: usize,
    seed: u64,
) -> Result<RunMetrics> {
    let start: Instant = Instant::now();
    let (label, seed) = if generator.is_seeded() {
        (seed.to_string(), Some(seed))
    } else {
        (format!("Run {}", slot + 1), None)
    };
    let samples = generator.produce(config.sample_count, seed)?;
    let metrics = compute_metrics(&samples, config.buckets, &config.lags)?;
    let time_used: Duration = start.elapsed();
    debug!(
        "{} [{}]: rqs={:.4} p_chi={:.4} p_runs={:.4} in {:?}",
        generator.name(),
        label,
        metrics.rqs(),
        metrics.p_chi(),
        metrics.p_runs(),
        time_used
    );
    Ok(RunMetrics {
        label,
        seed,
        metrics,
        time_used,
    })
}

fn summarize(generator: &Generator, runs: Vec<RunMetrics>) -> GeneratorSummary {
    let scores: Vec<f64> = runs.iter().map(|r| r.metrics.rqs()).collect();
    let rqs_mean = scores.iter().mean();
    let rqs_std = scores.iter().population_std_dev();
    info!(
        "{}: RQS mean {:.4}, std {:.4} over {} runs",
        generator.name(),
        rqs_mean,
        rqs_std,
        runs.len()
    );
    GeneratorSummary {
        name: generator.name().to_owned(),
        seeded: generator.is_seeded(),
        rqs_mean,
        rqs_std,
        runs,
    }
}

/// Score every generator on every seed of the configuration.
/// Summaries come back in the order of `generators`.
pub fn run_benchmark(
    generators: &[Generator],
    config: &BenchmarkConfig,
) -> Result<Vec<GeneratorSummary>> {
    config.validate()?;
    info!(
        "Benchmarking {} generators, {} runs each, {} samples per run",
        generators.len(),
        config.seeds.len(),
        config.sample_count
    );

    let jobs: Vec<(&Generator, usize, u64)> = generators
        .iter()
        .flat_map(|generator| {
            config
                .seeds
                .iter()
                .enumerate()
                .map(move |(slot, &seed)| (generator, slot, seed))
        })
        .collect();

    let run_one =
        |&(generator, slot, seed): &(&Generator, usize, u64)| -> Result<RunMetrics> {
            run_single_test(generator, config, slot, seed)
        };

    let results: Vec<Result<RunMetrics>> = if let Some(threads) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| jobs.par_iter().map(run_one).collect())
    } else {
        jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(results.len());
    for result in results {
        runs.push(result?);
    }

    let mut summaries = Vec::with_capacity(generators.len());
    let mut runs = runs.into_iter();
    for generator in generators {
        let generator_runs: Vec<RunMetrics> = runs.by_ref().take(config.seeds.len()).collect();
        summaries.push(summarize(generator, generator_runs));
    }
    Ok(summaries)
}
