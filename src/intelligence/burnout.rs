// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-based burnout risk assessment over a rolling window of daily aggregates
//!
//! Three signals are checked in a fixed order and each adds its weight to the
//! risk score:
//! 1. sustained workload above the daily-hours threshold
//! 2. a falling completion rate
//! 3. falling energy/focus self-ratings, when any were logged

use super::aggregator::DailyAggregate;
use super::forecaster::LinearFit;
use super::AnalysisError;
use crate::config::engine_config::ConfigError;
use crate::config::BurnoutConfig;
use crate::constants::defaults::SLOPE_FLOOR;
use crate::logging::EngineLogger;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heuristic signal that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurnoutFactor {
    #[serde(rename = "sustained high workload")]
    SustainedWorkload,
    #[serde(rename = "declining completion rate")]
    DecliningCompletion,
    #[serde(rename = "declining energy and focus")]
    DecliningWellbeing,
}

impl BurnoutFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutFactor::SustainedWorkload => "sustained high workload",
            BurnoutFactor::DecliningCompletion => "declining completion rate",
            BurnoutFactor::DecliningWellbeing => "declining energy and focus",
        }
    }
}

impl fmt::Display for BurnoutFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements taken over the window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub avg_daily_hours: f64,
    pub days_over_threshold: usize,
    pub inactive_days: usize,
    /// Completion-rate change per day across active days
    pub completion_slope: Option<f64>,
    /// Energy/focus change per day across rated days
    pub wellbeing_slope: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnoutAssessment {
    pub risk_level: RiskLevel,
    /// Fired signals, in evaluation order
    pub contributing_factors: Vec<BurnoutFactor>,
    pub window_days: usize,
    /// Days actually available inside the window
    pub days_considered: usize,
    /// History was shorter than the window
    pub reduced_confidence: bool,
    /// Sum of the weights of fired signals
    pub risk_score: f64,
    pub metrics: WindowMetrics,
}

impl BurnoutAssessment {
    pub fn has_factor(&self, factor: BurnoutFactor) -> bool {
        self.contributing_factors.contains(&factor)
    }

    pub fn factor_names(&self) -> Vec<String> {
        self.contributing_factors
            .iter()
            .map(|f| f.as_str().to_string())
            .collect()
    }
}

/// Burnout risk assessor
#[derive(Debug, Clone)]
pub struct BurnoutAssessor {
    config: BurnoutConfig,
}

impl BurnoutAssessor {
    pub fn new(config: BurnoutConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Assess over the configured window
    pub fn assess(&self, aggregates: &[DailyAggregate]) -> BurnoutAssessment {
        self.evaluate(aggregates, self.config.window_days)
    }

    /// Assess over an explicit window
    pub fn assess_window(
        &self,
        aggregates: &[DailyAggregate],
        window_days: usize,
    ) -> Result<BurnoutAssessment, AnalysisError> {
        if window_days == 0 {
            return Err(ConfigError::NotPositive {
                key: "burnout.window_days",
                value: window_days.to_string(),
            }
            .into());
        }
        Ok(self.evaluate(aggregates, window_days))
    }

    fn evaluate(&self, aggregates: &[DailyAggregate], window_days: usize) -> BurnoutAssessment {
        let start = aggregates.len().saturating_sub(window_days);
        let window = &aggregates[start..];
        let days_considered = window.len();

        let days_over_threshold = window
            .iter()
            .filter(|d| d.total_hours > self.config.workload_hours_threshold)
            .count();
        let inactive_days = window.iter().filter(|d| d.task_count == 0).count();
        let avg_daily_hours = if days_considered > 0 {
            window.iter().map(|d| d.total_hours).sum::<f64>() / days_considered as f64
        } else {
            0.0
        };

        // only days with logged tasks say anything about completion
        let completion_points: Vec<(f64, f64)> = window
            .iter()
            .enumerate()
            .filter(|(_, d)| d.task_count > 0)
            .map(|(i, d)| (i as f64, d.completion_rate))
            .collect();
        let wellbeing_points: Vec<(f64, f64)> = window
            .iter()
            .enumerate()
            .filter(|(_, d)| d.task_count > 0)
            .filter_map(|(i, d)| d.wellbeing().map(|w| (i as f64, w)))
            .collect();

        let metrics = WindowMetrics {
            avg_daily_hours,
            days_over_threshold,
            inactive_days,
            completion_slope: self.slope(&completion_points),
            wellbeing_slope: self.slope(&wellbeing_points),
        };

        let mut contributing_factors = Vec::new();
        let mut risk_score = 0.0;

        if days_considered > 0 && days_over_threshold >= self.required_heavy_days(days_considered) {
            contributing_factors.push(BurnoutFactor::SustainedWorkload);
            risk_score += self.config.workload_signal_weight;
        }
        if metrics.completion_slope.is_some_and(is_declining) {
            contributing_factors.push(BurnoutFactor::DecliningCompletion);
            risk_score += self.config.completion_signal_weight;
        }
        if metrics.wellbeing_slope.is_some_and(is_declining) {
            contributing_factors.push(BurnoutFactor::DecliningWellbeing);
            risk_score += self.config.wellbeing_signal_weight;
        }

        let risk_level = if contributing_factors.is_empty() {
            RiskLevel::Low
        } else if risk_score >= self.config.high_at {
            RiskLevel::High
        } else if risk_score >= self.config.medium_at {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let assessment = BurnoutAssessment {
            risk_level,
            contributing_factors,
            window_days,
            days_considered,
            reduced_confidence: days_considered < window_days,
            risk_score,
            metrics,
        };
        EngineLogger::log_burnout(
            assessment.risk_level.as_str(),
            &assessment.factor_names(),
            days_considered,
        );
        assessment
    }

    /// Heavy days needed for the workload signal, at least one
    ///
    /// Rounds to nearest, so 4 of 7 days (and 2 of 4) qualify at the default
    /// 0.6 fraction.
    fn required_heavy_days(&self, days_considered: usize) -> usize {
        let required = (self.config.sustained_fraction * days_considered as f64).round() as usize;
        required.max(1)
    }

    fn slope(&self, points: &[(f64, f64)]) -> Option<f64> {
        if points.len() < self.config.min_trend_points {
            return None;
        }
        LinearFit::fit(points).map(|fit| fit.slope)
    }
}

fn is_declining(slope: f64) -> bool {
    slope < -SLOPE_FLOOR
}
