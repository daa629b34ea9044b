// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine configuration sections for forecasting, scoring, burnout and recommendations

use crate::constants::defaults;
use serde::{Deserialize, Serialize};

/// Main engine configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub scoring: ScoringConfig,
    pub burnout: BurnoutConfig,
    pub recommendations: RecommendationConfig,
}

/// Metric forecaster parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Future days to extrapolate
    pub horizon: usize,
    /// Fewer observed days than this yields an unavailable forecast
    pub min_points: usize,
    /// Below this many days a produced forecast is flagged low-confidence
    pub full_confidence_days: usize,
    /// Only the most recent `lookback_days` aggregates are fitted
    pub lookback_days: usize,
    /// Slope tolerance as a fraction of the series' own spread
    pub trend_sensitivity: f64,
}

/// Daily productivity score composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub daily_task_target: f64,
    pub completion_weight: f64,
    pub volume_weight: f64,
    pub priority_weight: f64,
    pub low_weight: f64,
    pub medium_weight: f64,
    pub high_weight: f64,
}

/// Rolling-window burnout heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnoutConfig {
    pub window_days: usize,
    pub workload_hours_threshold: f64,
    pub sustained_fraction: f64,
    pub min_trend_points: usize,
    pub workload_signal_weight: f64,
    pub completion_signal_weight: f64,
    pub wellbeing_signal_weight: f64,
    pub medium_at: f64,
    pub high_at: f64,
}

/// Recommendation trigger thresholds and ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub high_daily_hours: f64,
    pub light_daily_hours: f64,
    /// Percent
    pub low_completion_rate: f64,
    /// Percent
    pub excellent_completion_rate: f64,
    pub acceptance_weight: f64,
}

/// Invalid configuration value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be positive (got {value})")]
    NotPositive { key: &'static str, value: String },

    #[error("{key} must be at least {min} (got {value})")]
    TooSmall { key: &'static str, min: String, value: String },

    #[error("{key} must be a finite, non-negative number (got {value})")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must lie in {range} (got {value})")]
    OutOfRange { key: &'static str, range: &'static str, value: String },

    #[error("{key} ({value}) breaks the risk mapping: one signal must score medium and any two must score high")]
    RiskMapping { key: &'static str, value: String },
}

impl EngineConfig {
    /// Check every section, returning the first offending value
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forecast.validate()?;
        self.scoring.validate()?;
        self.burnout.validate()?;
        self.recommendations.validate()
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_horizon(self.horizon)?;
        validate_min_points(self.min_points)?;
        if self.full_confidence_days == 0 {
            return Err(ConfigError::NotPositive {
                key: "forecast.full_confidence_days",
                value: self.full_confidence_days.to_string(),
            });
        }
        if self.lookback_days < self.min_points {
            return Err(ConfigError::TooSmall {
                key: "forecast.lookback_days",
                min: format!("forecast.min_points ({})", self.min_points),
                value: self.lookback_days.to_string(),
            });
        }
        non_negative("forecast.trend_sensitivity", self.trend_sensitivity)
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.daily_task_target.is_finite() && self.daily_task_target > 0.0) {
            return Err(ConfigError::NotPositive {
                key: "scoring.daily_task_target",
                value: self.daily_task_target.to_string(),
            });
        }
        non_negative("scoring.completion_weight", self.completion_weight)?;
        non_negative("scoring.volume_weight", self.volume_weight)?;
        non_negative("scoring.priority_weight", self.priority_weight)?;
        unit_interval("scoring.low_weight", self.low_weight)?;
        unit_interval("scoring.medium_weight", self.medium_weight)?;
        unit_interval("scoring.high_weight", self.high_weight)
    }

    /// Map a priority to its 0-1 weight
    pub fn weight_for(&self, priority: crate::models::Priority) -> f64 {
        use crate::models::Priority;
        match priority {
            Priority::Low => self.low_weight,
            Priority::Medium => self.medium_weight,
            Priority::High => self.high_weight,
        }
    }
}

impl BurnoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::NotPositive {
                key: "burnout.window_days",
                value: self.window_days.to_string(),
            });
        }
        non_negative("burnout.workload_hours_threshold", self.workload_hours_threshold)?;
        if !(self.sustained_fraction > 0.0 && self.sustained_fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "burnout.sustained_fraction",
                range: "(0, 1]",
                value: self.sustained_fraction.to_string(),
            });
        }
        if self.min_trend_points < 2 {
            return Err(ConfigError::TooSmall {
                key: "burnout.min_trend_points",
                min: "2".to_string(),
                value: self.min_trend_points.to_string(),
            });
        }
        non_negative("burnout.workload_signal_weight", self.workload_signal_weight)?;
        non_negative("burnout.completion_signal_weight", self.completion_signal_weight)?;
        non_negative("burnout.wellbeing_signal_weight", self.wellbeing_signal_weight)?;
        non_negative("burnout.medium_at", self.medium_at)?;
        non_negative("burnout.high_at", self.high_at)?;
        if self.high_at < self.medium_at {
            return Err(ConfigError::TooSmall {
                key: "burnout.high_at",
                min: format!("burnout.medium_at ({})", self.medium_at),
                value: self.high_at.to_string(),
            });
        }
        self.validate_risk_mapping()
    }

    /// Weights and thresholds must keep 0/1/2+ fired signals on low/medium/high
    fn validate_risk_mapping(&self) -> Result<(), ConfigError> {
        let weights = [
            ("burnout.workload_signal_weight", self.workload_signal_weight),
            ("burnout.completion_signal_weight", self.completion_signal_weight),
            ("burnout.wellbeing_signal_weight", self.wellbeing_signal_weight),
        ];
        for (key, weight) in weights {
            if weight < self.medium_at || weight >= self.high_at {
                return Err(ConfigError::RiskMapping { key, value: weight.to_string() });
            }
        }
        for (i, (_, a)) in weights.iter().enumerate() {
            for (_, b) in &weights[i + 1..] {
                if a + b < self.high_at {
                    return Err(ConfigError::RiskMapping {
                        key: "burnout.high_at",
                        value: self.high_at.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("recommendations.high_daily_hours", self.high_daily_hours)?;
        non_negative("recommendations.light_daily_hours", self.light_daily_hours)?;
        percentage("recommendations.low_completion_rate", self.low_completion_rate)?;
        percentage("recommendations.excellent_completion_rate", self.excellent_completion_rate)?;
        if !(self.acceptance_weight >= 0.0 && self.acceptance_weight < 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "recommendations.acceptance_weight",
                range: "[0, 1)",
                value: self.acceptance_weight.to_string(),
            });
        }
        Ok(())
    }
}

/// Horizon check shared by the config and by direct forecaster calls
pub fn validate_horizon(horizon: usize) -> Result<(), ConfigError> {
    if horizon == 0 {
        return Err(ConfigError::NotPositive {
            key: "forecast.horizon",
            value: horizon.to_string(),
        });
    }
    Ok(())
}

/// A regression line needs two points
pub fn validate_min_points(min_points: usize) -> Result<(), ConfigError> {
    if min_points < 2 {
        return Err(ConfigError::TooSmall {
            key: "forecast.min_points",
            min: "2".to_string(),
            value: min_points.to_string(),
        });
    }
    Ok(())
}

fn non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidNumber { key, value: value.to_string() })
    }
}

fn unit_interval(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { key, range: "[0, 1]", value: value.to_string() })
    }
}

fn percentage(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { key, range: "[0, 100]", value: value.to_string() })
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: defaults::FORECAST_HORIZON,
            min_points: defaults::MIN_FORECAST_POINTS,
            full_confidence_days: defaults::FULL_CONFIDENCE_DAYS,
            lookback_days: defaults::LOOKBACK_DAYS,
            trend_sensitivity: defaults::TREND_SENSITIVITY,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            daily_task_target: defaults::DAILY_TASK_TARGET,
            completion_weight: defaults::COMPLETION_WEIGHT,
            volume_weight: defaults::VOLUME_WEIGHT,
            priority_weight: defaults::PRIORITY_WEIGHT,
            low_weight: defaults::LOW_PRIORITY_WEIGHT,
            medium_weight: defaults::MEDIUM_PRIORITY_WEIGHT,
            high_weight: defaults::HIGH_PRIORITY_WEIGHT,
        }
    }
}

impl Default for BurnoutConfig {
    fn default() -> Self {
        Self {
            window_days: defaults::BURNOUT_WINDOW_DAYS,
            workload_hours_threshold: defaults::WORKLOAD_HOURS_THRESHOLD,
            sustained_fraction: defaults::SUSTAINED_FRACTION,
            min_trend_points: defaults::MIN_TREND_POINTS,
            workload_signal_weight: defaults::SIGNAL_WEIGHT,
            completion_signal_weight: defaults::SIGNAL_WEIGHT,
            wellbeing_signal_weight: defaults::SIGNAL_WEIGHT,
            medium_at: defaults::MEDIUM_RISK_AT,
            high_at: defaults::HIGH_RISK_AT,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            high_daily_hours: defaults::HIGH_DAILY_HOURS,
            light_daily_hours: defaults::LIGHT_DAILY_HOURS,
            low_completion_rate: defaults::LOW_COMPLETION_RATE,
            excellent_completion_rate: defaults::EXCELLENT_COMPLETION_RATE,
            acceptance_weight: defaults::ACCEPTANCE_WEIGHT,
        }
    }
}
