// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Randomness Quality Score (RQS) benchmark for PRNGs.
//!
//! The scoring core ([`conditioning`], [`stats`], [`score`]) turns raw u32
//! samples into four sub-scores and their composite. [`rngs`] holds the
//! generators under study and [`rng_testing`] drives them across seeds.

pub mod conditioning;
pub mod config;
pub mod error;
pub mod report;
pub mod rng_testing;
pub mod rngs;
pub mod score;
pub mod stats;
mod strings;
pub mod utils;

pub use config::BenchmarkConfig;
pub use error::{Result, RqsError};
pub use rng_testing::{compute_metrics, run_benchmark, GeneratorSummary, SampleMetrics};
pub use score::{aggregate_score, ScoreRecord};
