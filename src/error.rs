// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Error type shared by the scoring core and the benchmark driver.
//!
//! Statistically degenerate input (zero variance, a lag longer than the data,
//! a single-class binarization) is never an error; those cases return neutral
//! results. Only malformed input and driver failures end up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RqsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generator `{0}` requires a seed")]
    MissingSeed(String),

    #[error("entropy source unavailable: {0}")]
    EntropySource(String),

    #[error("worker pool failed to start: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RqsError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RqsError::InvalidInput(reason.into())
    }

    /// True for malformed caller input, as opposed to driver failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RqsError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, RqsError>;
