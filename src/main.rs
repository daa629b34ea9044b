// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neurotrack::config::EngineConfig;
use neurotrack::intelligence::{AcceptanceRatios, ProductivityAnalyzer, ProductivityReport};
use neurotrack::logging;
use neurotrack::task_log::TaskLog;
use std::fs;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Task log (JSON array of task records)
    #[arg(short, long)]
    tasks: String,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Acceptance ratios per recommendation category (JSON object)
    #[arg(short, long)]
    feedback: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = Args::parse();

    let config = EngineConfig::load(args.config)?;
    let log = TaskLog::load(&args.tasks)?;
    if log.rejected_count() > 0 {
        warn!("{} task log rows could not be decoded", log.rejected_count());
    }

    let feedback = args.feedback.as_deref().map(load_feedback).transpose()?;

    info!("Analyzing {} task records from {}", log.records.len(), args.tasks);
    let analyzer = ProductivityAnalyzer::new(config)?;
    let report = analyzer.analyze(&log.records, feedback.as_ref());

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Pretty => print_report(&report),
    }

    Ok(())
}

fn load_feedback(path: &str) -> Result<AcceptanceRatios> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feedback file: {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse feedback file: {}", path))
}

fn print_report(report: &ProductivityReport) {
    let aggregation = &report.aggregation;
    println!(
        "Days analyzed: {} ({} malformed records skipped)",
        aggregation.days.len(),
        aggregation.skipped
    );

    let summary = &report.summary;
    match (summary.forecast_start, summary.forecast_end) {
        (Some(start), Some(end)) => println!("\nForecast {} to {}", start, end),
        _ => println!("\nForecast"),
    }
    for result in summary.results() {
        match result.forecast() {
            Some(forecast) => println!(
                "  {:<13} avg {:>6.1}  trend {:<10}  confidence {}",
                result.metric.as_str(),
                forecast.average(),
                forecast.trend.as_str(),
                forecast.confidence.as_str()
            ),
            None => println!("  {:<13} unavailable (not enough history)", result.metric.as_str()),
        }
    }
    for insight in &summary.insights {
        println!("  * {}", insight.message);
    }

    let burnout = &report.burnout;
    println!(
        "\nBurnout risk: {} over {} of {} days",
        burnout.risk_level, burnout.days_considered, burnout.window_days
    );
    for factor in &burnout.contributing_factors {
        println!("  - {}", factor);
    }

    if report.recommendations.is_empty() {
        println!("\nNo recommendations");
    } else {
        println!("\nRecommendations");
        for (i, rec) in report.recommendations.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, rec.category, rec.text);
        }
    }

    let weekly = &report.weekly;
    println!(
        "\nLast 7 days: {:.1} hours, {}/{} tasks completed ({:.0}%)",
        weekly.total_hours, weekly.completed_tasks, weekly.total_tasks, weekly.completion_rate
    );
}
