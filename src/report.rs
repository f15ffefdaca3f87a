// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Text and JSON rendering of benchmark results.
//! Verbosity comes from the [`BenchmarkConfig`] passed in, never from globals.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::rng_testing::GeneratorSummary;
use crate::{strings, utils};

const SUMMARY_RULE_WIDTH: usize = 58;
const DETAIL_RULE_WIDTH: usize = 54;

pub fn format_header(config: &BenchmarkConfig, generated_at: &DateTime<Local>) -> String {
    format!(
        "{}\nStarted: {}\nSamples per run: {} ({})   Buckets: {}   Lags: {:?}   Runs per generator: {}",
        strings::BANNER,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        config.sample_count,
        utils::format_byte_count(config.sample_count * 4),
        config.buckets,
        config.lags,
        config.seeds.len()
    )
}

/// Per-seed table for every generator.
pub fn format_details(summaries: &[GeneratorSummary]) -> String {
    let [seed, rqs, p_chi, p_runs, time] = strings::DETAIL_COLUMNS;
    let mut out = String::from(strings::DETAILS_TITLE);
    for summary in summaries {
        out.push_str(&format!("\n\nGenerator: {}\n", summary.name));
        out.push_str(&format!(
            "  {:<10} | {:<8} | {:<8} | {:<8} | {}\n",
            seed, rqs, p_chi, p_runs, time
        ));
        out.push_str(&format!("  {}", "-".repeat(DETAIL_RULE_WIDTH)));
        for run in &summary.runs {
            out.push_str(&format!(
                "\n  {:<10} | {:<8.4} | {:<8.4} | {:<8.4} | {}",
                run.label,
                run.metrics.rqs(),
                run.metrics.p_chi(),
                run.metrics.p_runs(),
                utils::format_elapsed_time(run.time_used)
            ));
        }
    }
    out
}

/// RQS mean and standard deviation per generator.
pub fn format_summary(summaries: &[GeneratorSummary]) -> String {
    let [generator, mean, std_dev] = strings::SUMMARY_COLUMNS;
    let rule = "-".repeat(SUMMARY_RULE_WIDTH);
    let mut out = format!(
        "{}\n{:<25} | {:<12} | {:<15}\n{}",
        strings::SUMMARY_TITLE,
        generator,
        mean,
        std_dev,
        rule
    );
    for summary in summaries {
        out.push_str(&format!(
            "\n{:<25} | {:<12.4} | {:<15.4}",
            summary.name, summary.rqs_mean, summary.rqs_std
        ));
    }
    out.push('\n');
    out.push_str(&rule);
    out
}

pub fn render_text(
    summaries: &[GeneratorSummary],
    config: &BenchmarkConfig,
    generated_at: &DateTime<Local>,
) -> String {
    let mut sections = vec![format_header(config, generated_at)];
    if config.verbose {
        sections.push(format_details(summaries));
    }
    sections.push(format_summary(summaries));
    sections.join("\n\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    config: &'a BenchmarkConfig,
    generators: &'a [GeneratorSummary],
}

pub fn render_json(
    summaries: &[GeneratorSummary],
    config: &BenchmarkConfig,
    generated_at: &DateTime<Local>,
) -> Result<String> {
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        config,
        generators: summaries,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
