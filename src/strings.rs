// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! User interaction strings are stored here.

pub const BANNER: &str = "Running PRNG benchmark...";
pub const DETAILS_TITLE: &str = "--- Detailed Per-Seed Results ---";
pub const SUMMARY_TITLE: &str = "--- Benchmark Summary (Table 1) ---";

pub const DETAIL_COLUMNS: [&str; 5] = ["Seed", "RQS", "p_chi", "p_runs", "Time"];
pub const SUMMARY_COLUMNS: [&str; 3] = ["Generator", "RQS Mean", "RQS Std. Dev."];
