// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Benchmark configuration.

use serde::Serialize;

use crate::error::{Result, RqsError};
use crate::stats::DEFAULT_BUCKETS;

pub const DEFAULT_SAMPLE_COUNT: usize = 100_000;
pub const DEFAULT_LAGS: [usize; 5] = [1, 2, 3, 4, 5];
pub const DEFAULT_SEEDS: [u64; 10] = [
    42, 424242, 1337, 8675309, 1234567, 314159, 271828, 1618033, 4444, 9001,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkConfig {
    /// Samples drawn per run.
    pub sample_count: usize,
    /// Histogram buckets, shared by every run of a comparison.
    pub buckets: usize,
    pub lags: Vec<usize>,
    /// One run per seed. Entropy sources get one unseeded run per entry.
    pub seeds: Vec<u64>,
    /// Include the per-seed table in the report.
    pub verbose: bool,
    /// Worker threads; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sample_count: DEFAULT_SAMPLE_COUNT,
            buckets: DEFAULT_BUCKETS,
            lags: DEFAULT_LAGS.to_vec(),
            seeds: DEFAULT_SEEDS.to_vec(),
            verbose: true,
            jobs: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(RqsError::invalid("sample count must be positive"));
        }
        if self.buckets == 0 {
            return Err(RqsError::invalid("bucket count must be positive"));
        }
        if self.lags.is_empty() {
            return Err(RqsError::invalid("at least one lag is required"));
        }
        if self.seeds.is_empty() {
            return Err(RqsError::invalid("at least one seed is required"));
        }
        if self.jobs == Some(0) {
            return Err(RqsError::invalid("jobs must be >= 1 when provided"));
        }
        Ok(())
    }
}
