// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Composite Randomness Quality Score.
//!
//! Each p value based sub-score peaks at 1 when p = 0.5 and falls off linearly
//! to 0 towards either tail. The four sub-scores are weighted equally.

use serde::Serialize;

/// Sub-scores and their composite, all nominally in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub s_entropy: f64,
    pub s_uniformity: f64,
    pub s_autocorrelation: f64,
    pub s_runs: f64,
    pub rqs: f64,
}

/// Linear closeness of a p value to 0.5: 1 - 2|p - 0.5|.
pub fn p_centrality(p: f64) -> f64 {
    1.0 - 2.0 * (p - 0.5).abs()
}

/// Combine normalized entropy and the test p values into a [`ScoreRecord`].
/// An empty lag set scores 0 for autocorrelation.
pub fn aggregate_score(h_norm: f64, p_chi: f64, p_lags: &[f64], p_runs: f64) -> ScoreRecord {
    let s_entropy = h_norm;
    let s_uniformity = p_centrality(p_chi);
    let s_autocorrelation = if p_lags.is_empty() {
        0.0
    } else {
        let mut sum: f64 = 0.0;
        for &p in p_lags {
            sum += p_centrality(p);
        }
        sum / p_lags.len() as f64
    };
    let s_runs = p_centrality(p_runs);
    ScoreRecord {
        s_entropy,
        s_uniformity,
        s_autocorrelation,
        s_runs,
        rqs: 0.25 * (s_entropy + s_uniformity + s_autocorrelation + s_runs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centrality_shape() {
        assert_eq!(p_centrality(0.5), 1.0);
        assert_eq!(p_centrality(0.0), 0.0);
        assert_eq!(p_centrality(1.0), 0.0);
        assert_eq!(p_centrality(0.25), 0.5);
        assert_eq!(p_centrality(0.75), 0.5);
    }

    #[test]
    fn ideal_inputs_score_one() {
        let s = aggregate_score(1.0, 0.5, &[0.5, 0.5, 0.5], 0.5);
        assert_eq!(s.rqs, 1.0);
    }

    #[test]
    fn worst_inputs_score_zero() {
        let s = aggregate_score(0.0, 1.0, &[0.0, 1.0], 0.0);
        assert_eq!(s.rqs, 0.0);
    }

    #[test]
    fn mixed_inputs() {
        let s = aggregate_score(0.8, 0.25, &[0.5, 0.0], 0.75);
        assert_eq!(s.s_entropy, 0.8);
        assert_eq!(s.s_uniformity, 0.5);
        assert_eq!(s.s_autocorrelation, 0.5);
        assert_eq!(s.s_runs, 0.5);
        assert!((s.rqs - 0.575).abs() < 1e-15);
    }

    #[test]
    fn empty_lags_score_zero() {
        let s = aggregate_score(1.0, 0.5, &[], 0.5);
        assert_eq!(s.s_autocorrelation, 0.0);
        assert_eq!(s.rqs, 0.75);
    }
}
