// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Forecasting and risk assessment over a personal task log.
//!
//! Data flows leaves first:
//! - [`aggregator`] turns raw task records into a contiguous daily series
//! - [`forecaster`] extrapolates each metric series and labels its trend
//! - [`summary`] packages the four metric forecasts with scalar rollups
//! - [`burnout`] classifies recent workload into a risk level
//! - [`recommendation_engine`] turns forecasts and risk into ranked guidance
//! - [`analyzer`] runs the whole pipeline end to end

use crate::config::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod aggregator;
pub mod analyzer;
pub mod burnout;
pub mod forecaster;
pub mod insights;
pub mod recommendation_engine;
pub mod summary;

pub use aggregator::{Aggregation, DailyAggregate, DailyAggregator, ProductivityScorer, WeeklySummary, WeightedScorer};
pub use analyzer::{ProductivityAnalyzer, ProductivityReport};
pub use burnout::{BurnoutAssessment, BurnoutAssessor, BurnoutFactor, RiskLevel};
pub use forecaster::{ForecastOutcome, ForecastResult, MetricForecaster};
pub use insights::{Insight, InsightType};
pub use recommendation_engine::{
    AcceptanceRatios, FeedbackLedger, Recommendation, RecommendationCategory, RecommendationGenerator,
};
pub use summary::{ForecastSummary, SummaryBuilder};

/// Direction of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence bucket for a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// The four daily series the engine forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Composite 0-100 score
    Productivity,
    /// Hours worked
    Workload,
    /// Number of tasks
    Tasks,
    /// Completion rate, percent
    Completion,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Productivity,
        Metric::Workload,
        Metric::Tasks,
        Metric::Completion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Productivity => "productivity",
            Metric::Workload => "workload",
            Metric::Tasks => "tasks",
            Metric::Completion => "completion",
        }
    }

    /// Clamp a value into the metric's valid domain
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            Metric::Productivity | Metric::Completion => value.clamp(0.0, 100.0),
            Metric::Workload | Metric::Tasks => value.max(0.0),
        }
    }

    /// Read this metric off a daily aggregate
    pub fn value_of(&self, day: &DailyAggregate) -> f64 {
        match self {
            Metric::Productivity => day.productivity_score,
            Metric::Workload => day.total_hours,
            Metric::Tasks => day.task_count as f64,
            Metric::Completion => day.completion_rate,
        }
    }

    /// Extract this metric as a dated series
    pub fn series(&self, days: &[DailyAggregate]) -> Vec<DataPoint> {
        days.iter()
            .map(|day| DataPoint {
                date: day.date,
                value: self.value_of(day),
            })
            .collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated observation or prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Errors that can occur during analysis
///
/// Only `Configuration` is ever returned as an `Err`; the other variants
/// describe conditions the engine reports structurally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient data for {metric}: {available} days available, {required} required")]
    InsufficientData {
        metric: Metric,
        available: usize,
        required: usize,
    },

    #[error("Malformed task record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
}

/// English weekday name for a date
pub fn weekday_name(date: NaiveDate) -> &'static str {
    use chrono::{Datelike, Weekday};
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_domains() {
        assert_eq!(Metric::Completion.clamp(130.0), 100.0);
        assert_eq!(Metric::Productivity.clamp(-4.0), 0.0);
        assert_eq!(Metric::Workload.clamp(-1.0), 0.0);
        assert_eq!(Metric::Tasks.clamp(250.0), 250.0);
    }

    #[test]
    fn test_weekday_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(weekday_name(date), "Monday");
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InsufficientData {
            metric: Metric::Workload,
            available: 2,
            required: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data for workload: 2 days available, 3 required"
        );

        let err: AnalysisError = crate::config::engine_config::validate_horizon(0).unwrap_err().into();
        assert!(err.to_string().contains("forecast.horizon must be positive"));
    }

    #[test]
    fn test_trend_serialization() {
        assert_eq!(
            serde_json::to_value(TrendDirection::Increasing).unwrap(),
            serde_json::json!("increasing")
        );
    }
}
