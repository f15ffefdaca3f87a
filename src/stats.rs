// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Collection of methods for statistical analysis.
//!
//! All functions operate on a normalized sequence (see [`crate::conditioning`])
//! or on bucket counts derived from one. Every sum is reduced left to right over
//! the bucket or sequence index so results are bit-reproducible.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::conditioning::to_bitstream;
use crate::error::{Result, RqsError};

/// Default number of histogram buckets.
pub const DEFAULT_BUCKETS: usize = 256;

/// Bucket occupancy of a normalized sequence and its Shannon entropy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Entropy of the empirical bucket distribution in bits.
    pub entropy_bits: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn buckets(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Entropy divided by its maximum, log2(K).
    pub fn normalized_entropy(&self) -> f64 {
        normalized_entropy(self.entropy_bits, self.buckets())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
}

impl ChiSquareResult {
    const VACUOUS: ChiSquareResult = ChiSquareResult {
        statistic: 0.0,
        p_value: 1.0,
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct AutocorrelationResult {
    pub lag: usize,
    pub rho: f64,
    pub p_value: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RunsResult {
    pub runs: u64,
    pub mean: f64,
    pub variance: f64,
    pub z: f64,
    pub p_value: f64,
}

impl RunsResult {
    const DEGENERATE: RunsResult = RunsResult {
        runs: 0,
        mean: 0.0,
        variance: 0.0,
        z: 0.0,
        p_value: 1.0,
    };
}

/// Two sided p value of a standard normal z score: 2 * (1 - Phi(|z|)).
fn two_sided_normal_p(z: f64) -> f64 {
    let standard = Normal::standard();
    2.0 * (1.0 - standard.cdf(z.abs()))
}

/// Get p value for given degrees of freedom and chi squared value.
/// Upper tail, 1 - CDF, as the test statistic only grows with deviation.
fn chi_squared_p_value(df: u64, chi_squared: f64) -> f64 {
    match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(chi_squared),
        // Zero degrees of freedom leave nothing to test.
        Err(_) => 1.0,
    }
}

/// Bucket index of a unit float. Values at or above 1.0 land in the last
/// bucket, values below 0.0 in the first.
fn bucket_index(value: f64, buckets: usize) -> usize {
    // `as usize` saturates negatives and NaN to 0.
    ((value * buckets as f64) as usize).min(buckets - 1)
}

/// Sort the normalized sequence into 'buckets' equal width bins over [0, 1)
/// and compute the Shannon entropy of the occupancy in bits.
/// Empty buckets contribute nothing to the entropy.
pub fn histogram(u: &[f64], buckets: usize) -> Result<Histogram> {
    if u.is_empty() {
        return Err(RqsError::invalid("normalized sequence is empty"));
    }
    if buckets == 0 {
        return Err(RqsError::invalid("bucket count must be positive"));
    }
    let mut counts = vec![0u64; buckets];
    for &value in u {
        counts[bucket_index(value, buckets)] += 1;
    }
    let total = u.len() as f64;
    let mut entropy_bits: f64 = 0.0;
    for &count in counts.iter().filter(|&&c| c > 0) {
        let p = count as f64 / total;
        entropy_bits -= p * p.log2();
    }
    Ok(Histogram {
        entropy_bits,
        counts,
    })
}

/// Entropy relative to the maximum log2(buckets). 0 for a single bucket.
pub fn normalized_entropy(entropy_bits: f64, buckets: usize) -> f64 {
    if buckets <= 1 {
        return 0.0;
    }
    entropy_bits / (buckets as f64).log2()
}

/// Chi squared goodness of fit of the bucket counts against a uniform
/// expectation, K - 1 degrees of freedom. Every bucket takes part,
/// including empty ones.
/// Returns chi2 statistic, p value
pub fn chi_square_uniformity(counts: &[u64]) -> ChiSquareResult {
    let buckets = counts.len();
    let total: u64 = counts.iter().sum();
    // A single bucket has zero degrees of freedom.
    if buckets <= 1 || total == 0 {
        return ChiSquareResult::VACUOUS;
    }
    let expected = total as f64 / buckets as f64;
    let mut chi_squared: f64 = 0.0;
    for &value in counts {
        chi_squared += (value as f64 - expected).powi(2) / expected;
    }
    ChiSquareResult {
        statistic: chi_squared,
        p_value: chi_squared_p_value(buckets as u64 - 1, chi_squared),
    }
}

/// Lag-k sample autocorrelation with an asymptotic normal p value.
/// A lag of zero, a lag not shorter than the sequence, or a constant
/// sequence all yield rho = 0, p = 1.
pub fn autocorrelation(u: &[f64], lag: usize) -> AutocorrelationResult {
    let vacuous = AutocorrelationResult {
        lag,
        rho: 0.0,
        p_value: 1.0,
    };
    let n = u.len();
    if lag == 0 || n <= lag {
        return vacuous;
    }
    // A rounded mean need not equal the constant itself, so check directly.
    if u.iter().all(|&value| value == u[0]) {
        return vacuous;
    }
    let mut sum: f64 = 0.0;
    for &value in u {
        sum += value;
    }
    let mean = sum / n as f64;
    let centered: Vec<f64> = u.iter().map(|&value| value - mean).collect();

    let mut denom: f64 = 0.0;
    for &c in &centered {
        denom += c * c;
    }
    if denom == 0.0 {
        return vacuous;
    }
    let mut num: f64 = 0.0;
    for (a, b) in centered[..n - lag].iter().zip(&centered[lag..]) {
        num += a * b;
    }
    let rho = num / denom;
    let z = rho * (n as f64).sqrt();
    AutocorrelationResult {
        lag,
        rho,
        p_value: two_sided_normal_p(z),
    }
}

/// Evaluate [`autocorrelation`] independently for every lag, in order.
/// No multiple comparison correction is applied.
pub fn autocorrelation_lags(u: &[f64], lags: &[usize]) -> Vec<AutocorrelationResult> {
    lags.iter().map(|&lag| autocorrelation(u, lag)).collect()
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Wald-Wolfowitz runs test on the sequence binarized at 0.5.
/// A sequence shorter than two or containing only one class is degenerate
/// and returns zero runs with p = 1.
pub fn runs_test(u: &[f64]) -> RunsResult {
    let bits = to_bitstream(u);
    let n = bits.len() as u64;
    let ones: u64 = bits.iter().map(|&b| b as u64).sum();
    let zeros = n - ones;
    if n <= 1 || ones == 0 || zeros == 0 {
        return RunsResult::DEGENERATE;
    }
    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count() as u64;
    let mean = (2.0 * ones as f64 * zeros as f64) / n as f64 + 1.0;

    // Exact integer numerator and denominator; they overflow u64 beyond ~10^5 samples.
    let product = 2 * ones as i128 * zeros as i128;
    let variance_num = product * (product - n as i128);
    let variance_den = (n as i128) * (n as i128) * (n as i128 - 1);
    if variance_den == 0 {
        return RunsResult {
            runs,
            mean,
            variance: 0.0,
            z: 0.0,
            p_value: 1.0,
        };
    }
    // Reduce first so most fractions convert to f64 exactly and round only once.
    let divisor = gcd(variance_num.unsigned_abs(), variance_den.unsigned_abs()).max(1) as i128;
    let variance = (variance_num / divisor) as f64 / (variance_den / divisor) as f64;
    let z = if variance > 0.0 {
        (runs as f64 - mean) / variance.sqrt()
    } else {
        0.0
    };
    RunsResult {
        runs,
        mean,
        variance,
        z,
        p_value: two_sided_normal_p(z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating(n: usize) -> Vec<f64> {
        (0..n).map(|i| if i % 2 == 0 { 0.1 } else { 0.9 }).collect()
    }

    #[test]
    fn histogram_single_bucket_has_zero_entropy() {
        let h = histogram(&[0.3; 100], 16).unwrap();
        assert_eq!(h.entropy_bits, 0.0);
        assert_eq!(h.normalized_entropy(), 0.0);
        assert_eq!(h.counts[4], 100);
    }

    #[test]
    fn histogram_uniform_reaches_log2_k() {
        let u: Vec<f64> = (0..64).map(|i| (i as f64 + 0.5) / 64.0).collect();
        let h = histogram(&u, 64).unwrap();
        assert!((h.entropy_bits - 6.0).abs() < 1e-12);
        assert!((h.normalized_entropy() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_places_one_in_last_bucket() {
        let h = histogram(&[1.0, 0.0], 4).unwrap();
        assert_eq!(h.counts, vec![1, 0, 0, 1]);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn histogram_rejects_bad_input() {
        assert!(histogram(&[], 4).unwrap_err().is_invalid_input());
        assert!(histogram(&[0.5], 0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn normalized_entropy_single_bucket() {
        assert_eq!(normalized_entropy(3.0, 1), 0.0);
        assert_eq!(normalized_entropy(1.0, 2), 1.0);
    }

    #[test]
    fn chi_square_perfectly_uniform() {
        let r = chi_square_uniformity(&[25, 25, 25, 25]);
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn chi_square_one_degree_of_freedom() {
        let r = chi_square_uniformity(&[8, 0]);
        assert_eq!(r.statistic, 8.0);
        assert!((r.p_value - 0.004677734981047265).abs() < 1e-12);
    }

    #[test]
    fn chi_square_vacuous_cases() {
        assert_eq!(chi_square_uniformity(&[]), ChiSquareResult::VACUOUS);
        assert_eq!(chi_square_uniformity(&[0, 0, 0]), ChiSquareResult::VACUOUS);
        assert_eq!(chi_square_uniformity(&[17]).p_value, 1.0);
    }

    #[test]
    fn chi_square_counts_empty_buckets() {
        let r = chi_square_uniformity(&[8, 0]);
        assert_eq!(r.statistic, 8.0);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn autocorrelation_constant_sequence() {
        let r = autocorrelation(&[0.25; 50], 1);
        assert_eq!(r.rho, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn autocorrelation_inexact_constants() {
        for u in [vec![0.1; 10], vec![0.7; 1000], vec![1.0 / 3.0; 77]] {
            let r = autocorrelation(&u, 1);
            assert_eq!((r.rho, r.p_value), (0.0, 1.0));
        }
    }

    #[test]
    fn autocorrelation_known_value() {
        // centered: -3/8 -1/8 1/8 3/8; num = 5/64, denom = 5/16
        let r = autocorrelation(&[0.0, 0.25, 0.5, 0.75], 1);
        assert_eq!(r.rho, 0.25);
        // z = 0.25 * sqrt(4) = 0.5, p = erfc(0.5 / sqrt(2))
        assert!((r.p_value - 0.6170750774519738).abs() < 1e-12);
    }

    #[test]
    fn autocorrelation_lag_too_long() {
        let r = autocorrelation(&[0.1, 0.9, 0.4], 3);
        assert_eq!((r.rho, r.p_value), (0.0, 1.0));
        let r = autocorrelation(&[0.1, 0.9, 0.4], 0);
        assert_eq!((r.rho, r.p_value), (0.0, 1.0));
    }

    #[test]
    fn autocorrelation_alternating_is_negative() {
        let u = alternating(1000);
        let r = autocorrelation(&u, 1);
        assert!(r.rho < -0.99);
        assert!(r.p_value < 1e-10);
        let r2 = autocorrelation(&u, 2);
        assert!(r2.rho > 0.99);
    }

    #[test]
    fn autocorrelation_lags_keep_order() {
        let u = alternating(100);
        let rs = autocorrelation_lags(&u, &[3, 1, 2]);
        let lags: Vec<usize> = rs.iter().map(|r| r.lag).collect();
        assert_eq!(lags, vec![3, 1, 2]);
    }

    #[test]
    fn runs_alternating_counts_every_change() {
        let r = runs_test(&alternating(20));
        assert_eq!(r.runs, 20);
        assert!(r.z > 0.0);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn runs_single_class_is_degenerate() {
        assert_eq!(runs_test(&[0.1; 10]), RunsResult::DEGENERATE);
        assert_eq!(runs_test(&[0.7; 10]), RunsResult::DEGENERATE);
        assert_eq!(runs_test(&[0.7]), RunsResult::DEGENERATE);
    }

    #[test]
    fn runs_zero_variance_gives_neutral_z() {
        // n1 = n0 = 1: 2*n1*n0 - n == 0
        let r = runs_test(&[0.1, 0.9]);
        assert_eq!(r.runs, 2);
        assert_eq!(r.variance, 0.0);
        assert_eq!(r.z, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn runs_known_values() {
        // b = 0 0 1 1 0 1: n1 = 3, n0 = 3, R = 4
        let r = runs_test(&[0.1, 0.2, 0.6, 0.7, 0.3, 0.8]);
        assert_eq!(r.runs, 4);
        assert_eq!(r.mean, 4.0);
        // 2*9*(18-6) / (36*5) = 216 / 180
        assert!((r.variance - 1.2).abs() < 1e-15);
        assert_eq!(r.z, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn runs_known_p_value() {
        // b = 0 1 0 1 0 1 0 1 0 1: n1 = n0 = 5, R = 10
        let r = runs_test(&[0.1, 0.9, 0.1, 0.9, 0.2, 0.8, 0.3, 0.6, 0.4, 0.55]);
        assert_eq!(r.runs, 10);
        assert_eq!(r.mean, 6.0);
        // 2*25*(50-10) / (100*9) = 20/9
        assert_eq!(r.variance, 20.0 / 9.0);
        assert!((r.z - 2.6832815729997477).abs() < 1e-12);
        assert!((r.p_value - 0.007290358091535644).abs() < 1e-12);
    }

    #[test]
    fn gcd_reduces() {
        assert_eq!(gcd(2000, 900), 100);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn tests_are_idempotent() {
        let u: Vec<f64> = (0..500).map(|i| ((i * 7919) % 1000) as f64 / 1000.0).collect();
        assert_eq!(runs_test(&u), runs_test(&u));
        assert_eq!(autocorrelation(&u, 3), autocorrelation(&u, 3));
        let h = histogram(&u, 32).unwrap();
        assert_eq!(h, histogram(&u, 32).unwrap());
        assert_eq!(
            chi_square_uniformity(&h.counts),
            chi_square_uniformity(&h.counts)
        );
    }
}
