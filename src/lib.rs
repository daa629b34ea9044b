// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # NeuroTrack
//!
//! A forecasting and burnout-risk engine for personal task logs.
//!
//! Given a snapshot of logged tasks, the engine rolls them up into daily
//! series, extrapolates productivity, workload, task throughput and
//! completion rate a few days ahead, classifies burnout risk from the most
//! recent week, and turns all of it into ranked recommendations.
//!
//! ## Features
//!
//! - **Deterministic**: the same task log always yields the same report
//! - **Partial results**: a metric with too little history is marked
//!   unavailable while the others are still forecast
//! - **Explainable risk**: burnout risk lists exactly the signals that fired
//! - **Feedback-aware ranking**: acceptance ratios from past feedback reorder
//!   recommendations within a severity level
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use neurotrack::config::EngineConfig;
//! use neurotrack::intelligence::ProductivityAnalyzer;
//! use neurotrack::task_log::TaskLog;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load(None)?;
//!     let log = TaskLog::load("tasks.json")?;
//!
//!     let analyzer = ProductivityAnalyzer::new(config)?;
//!     let report = analyzer.analyze(&log.records, None);
//!
//!     println!("Burnout risk: {}", report.burnout.risk_level);
//!     for rec in &report.recommendations {
//!         println!("- {}", rec.text);
//!     }
//!     Ok(())
//! }
//! ```

/// Task records and priorities
pub mod models;

/// Task log ingestion
pub mod task_log;

/// Configuration management and loading
pub mod config;

/// Application constants and default values
pub mod constants;

/// Forecasting, burnout assessment and recommendations
pub mod intelligence;

/// Structured logging setup and engine events
pub mod logging;
