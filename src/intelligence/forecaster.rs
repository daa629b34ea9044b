// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Metric forecasting by linear trend extrapolation
//!
//! Each series is fitted with ordinary least squares over its day index. The
//! fitted line is extended over the horizon and clamped to the metric's
//! domain. A trend is only reported when the slope is large relative to the
//! series' own spread, so flat but noisy data reads as stable.

use super::{AnalysisError, Confidence, DataPoint, Metric, TrendDirection};
use crate::config::engine_config::{validate_horizon, validate_min_points};
use crate::config::ForecastConfig;
use crate::constants::defaults::SLOPE_FLOOR;
use crate::logging::EngineLogger;
use chrono::Days;
use serde::{Deserialize, Serialize};

/// Least-squares line through `(x, y)` points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation, 0 when either axis has no spread
    pub correlation: f64,
    pub std_x: f64,
    pub std_y: f64,
    pub mean_y: f64,
}

impl LinearFit {
    /// Fit a line; needs at least two distinct x values
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in points {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }
        if sxx <= 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let correlation = if syy > 0.0 { sxy / (sxx * syy).sqrt() } else { 0.0 };

        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
            correlation,
            std_x: (sxx / n).sqrt(),
            std_y: (syy / n).sqrt(),
            mean_y,
        })
    }

    /// Fit over consecutive indices 0..n
    pub fn fit_series(values: &[f64]) -> Option<Self> {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();
        Self::fit(&points)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Label the slope against a tolerance scaled to the spread of the data
    pub fn trend(&self, sensitivity: f64) -> TrendDirection {
        let tolerance = if self.std_x > 0.0 {
            (sensitivity * self.std_y / self.std_x).max(SLOPE_FLOOR)
        } else {
            SLOPE_FLOOR
        };

        if self.slope > tolerance {
            TrendDirection::Increasing
        } else if self.slope < -tolerance {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Coefficient of variation of the observations
    fn variation(&self) -> f64 {
        if self.std_y == 0.0 {
            0.0
        } else if self.mean_y.abs() > 0.0 {
            self.std_y / self.mean_y.abs()
        } else {
            f64::INFINITY
        }
    }
}

/// A produced forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// One value per horizon day, clamped to the metric's domain
    pub values: Vec<DataPoint>,
    pub trend: TrendDirection,
    pub confidence: Confidence,
    /// 0-1, higher for steadier, longer histories
    pub confidence_score: f64,
    /// Fitted change per day
    pub slope: f64,
    /// Absolute correlation between day index and value
    pub trend_strength: f64,
    /// Fewer observed days than the full-confidence threshold
    pub low_history: bool,
}

impl Forecast {
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().map(|p| p.value).sum::<f64>() / self.values.len() as f64
    }

    pub fn total(&self) -> f64 {
        self.values.iter().map(|p| p.value).sum()
    }
}

/// Either a forecast or an explicit marker that history was too short
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Unavailable {
        available_points: usize,
        required_points: usize,
    },
    Available(Forecast),
}

/// Forecast for a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub metric: Metric,
    /// Observed values that were fitted, oldest first
    pub historical: Vec<DataPoint>,
    pub outcome: ForecastOutcome,
}

impl ForecastResult {
    pub fn forecast(&self) -> Option<&Forecast> {
        match &self.outcome {
            ForecastOutcome::Available(forecast) => Some(forecast),
            ForecastOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.forecast().is_some()
    }

    pub fn trend(&self) -> Option<TrendDirection> {
        self.forecast().map(|f| f.trend)
    }

    /// Why no forecast was produced, if it wasn't
    pub fn insufficiency(&self) -> Option<AnalysisError> {
        match self.outcome {
            ForecastOutcome::Unavailable {
                available_points,
                required_points,
            } => Some(AnalysisError::InsufficientData {
                metric: self.metric,
                available: available_points,
                required: required_points,
            }),
            ForecastOutcome::Available(_) => None,
        }
    }
}

/// Extrapolates daily metric series
#[derive(Debug, Clone)]
pub struct MetricForecaster {
    config: ForecastConfig,
}

impl MetricForecaster {
    /// Create a forecaster, rejecting invalid settings up front
    pub fn new(config: ForecastConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast with the configured horizon and minimum history
    pub fn forecast(&self, metric: Metric, series: &[DataPoint]) -> ForecastResult {
        self.extrapolate(metric, series, self.config.horizon, self.config.min_points)
    }

    /// Forecast with an explicit horizon and minimum history
    pub fn forecast_with(
        &self,
        metric: Metric,
        series: &[DataPoint],
        horizon: usize,
        min_points: usize,
    ) -> Result<ForecastResult, AnalysisError> {
        validate_horizon(horizon)?;
        validate_min_points(min_points)?;
        Ok(self.extrapolate(metric, series, horizon, min_points))
    }

    fn extrapolate(
        &self,
        metric: Metric,
        series: &[DataPoint],
        horizon: usize,
        min_points: usize,
    ) -> ForecastResult {
        let lookback = self.config.lookback_days.max(min_points);
        let start = series.len().saturating_sub(lookback);
        let historical = series[start..].to_vec();

        let values: Vec<f64> = historical.iter().map(|p| p.value).collect();
        let fit = if values.len() >= min_points {
            LinearFit::fit_series(&values)
        } else {
            None
        };

        let (Some(fit), Some(last)) = (fit, historical.last()) else {
            EngineLogger::log_forecast(metric.as_str(), "unavailable", None, None);
            return ForecastResult {
                metric,
                outcome: ForecastOutcome::Unavailable {
                    available_points: historical.len(),
                    required_points: min_points,
                },
                historical,
            };
        };

        let n = values.len();
        let future: Vec<DataPoint> = (0..horizon)
            .filter_map(|k| {
                let date = last.date.checked_add_days(Days::new(k as u64 + 1))?;
                let value = metric.clamp(fit.predict((n + k) as f64));
                Some(DataPoint { date, value })
            })
            .collect();

        let trend = fit.trend(self.config.trend_sensitivity);
        let (confidence, confidence_score) = self.confidence(&fit, n);

        EngineLogger::log_forecast(
            metric.as_str(),
            "available",
            Some(trend.as_str()),
            Some(confidence.as_str()),
        );

        ForecastResult {
            metric,
            historical,
            outcome: ForecastOutcome::Available(Forecast {
                values: future,
                trend,
                confidence,
                confidence_score,
                slope: fit.slope,
                trend_strength: fit.correlation.abs(),
                low_history: n < self.config.full_confidence_days,
            }),
        }
    }

    fn confidence(&self, fit: &LinearFit, n: usize) -> (Confidence, f64) {
        let coverage = (n as f64 / self.config.full_confidence_days as f64).min(1.0);
        let score = coverage / (1.0 + fit.variation());

        let level = if n < self.config.full_confidence_days {
            Confidence::Low
        } else if score >= 0.7 {
            Confidence::High
        } else if score >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        };
        (level, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<DataPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint {
                date: start + chrono::Duration::days(i as i64),
                value: *v,
            })
            .collect()
    }

    fn forecaster() -> MetricForecaster {
        MetricForecaster::new(ForecastConfig::default()).unwrap()
    }

    #[test]
    fn test_short_history_is_unavailable() {
        let result = forecaster().forecast(Metric::Workload, &series(&[4.0, 5.0]));

        assert!(!result.is_available());
        assert_eq!(
            result.outcome,
            ForecastOutcome::Unavailable {
                available_points: 2,
                required_points: 3
            }
        );
        assert_eq!(result.historical.len(), 2);
        assert!(matches!(
            result.insufficiency(),
            Some(AnalysisError::InsufficientData { available: 2, required: 3, .. })
        ));
    }

    #[test]
    fn test_empty_series_is_unavailable() {
        let result = forecaster().forecast(Metric::Tasks, &[]);
        assert!(!result.is_available());
    }

    #[test]
    fn test_linear_increase_extends_line() {
        let result = forecaster().forecast(Metric::Workload, &series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        let forecast = result.forecast().unwrap();

        assert_eq!(forecast.trend, TrendDirection::Increasing);
        assert_eq!(forecast.values.len(), 7);
        assert!((forecast.values[0].value - 8.0).abs() < 1e-9);
        assert!((forecast.values[6].value - 14.0).abs() < 1e-9);
        assert_eq!(forecast.values[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert!((forecast.slope - 1.0).abs() < 1e-9);
        assert!((forecast.trend_strength - 1.0).abs() < 1e-9);
        assert!(!forecast.low_history);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let result = forecaster().forecast(Metric::Productivity, &series(&[100.0; 10]));
        let forecast = result.forecast().unwrap();

        assert_eq!(forecast.trend, TrendDirection::Stable);
        assert_eq!(forecast.confidence, Confidence::High);
        assert!(forecast.values.iter().all(|p| (p.value - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_noisy_flat_series_is_stable() {
        let result = forecaster().forecast(
            Metric::Completion,
            &series(&[60.0, 40.0, 60.0, 40.0, 60.0, 40.0, 60.0, 40.0]),
        );
        assert_eq!(result.trend(), Some(TrendDirection::Stable));
    }

    #[test]
    fn test_forecast_clamped_to_domain() {
        let up = forecaster().forecast(Metric::Completion, &series(&[70.0, 80.0, 90.0, 100.0]));
        assert!(up.forecast().unwrap().values.iter().all(|p| p.value <= 100.0));

        let down = forecaster().forecast(Metric::Workload, &series(&[6.0, 4.0, 2.0]));
        let forecast = down.forecast().unwrap();
        assert_eq!(forecast.trend, TrendDirection::Decreasing);
        assert!(forecast.values.iter().all(|p| p.value >= 0.0));
        assert_eq!(forecast.values[6].value, 0.0);
    }

    #[test]
    fn test_short_history_flagged_low_confidence() {
        let result = forecaster().forecast(Metric::Tasks, &series(&[5.0, 5.0, 5.0]));
        let forecast = result.forecast().unwrap();

        assert!(forecast.low_history);
        assert_eq!(forecast.confidence, Confidence::Low);
    }

    #[test]
    fn test_lookback_limits_history() {
        let config = ForecastConfig {
            lookback_days: 5,
            ..ForecastConfig::default()
        };
        let forecaster = MetricForecaster::new(config).unwrap();
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();

        let result = forecaster.forecast(Metric::Tasks, &series(&values));
        assert_eq!(result.historical.len(), 5);
        assert_eq!(result.historical[0].value, 7.0);
    }

    #[test]
    fn test_explicit_parameters_validated() {
        let f = forecaster();
        let data = series(&[1.0, 2.0, 3.0]);

        assert!(matches!(
            f.forecast_with(Metric::Tasks, &data, 0, 3),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(f.forecast_with(Metric::Tasks, &data, 3, 1).is_err());

        let result = f.forecast_with(Metric::Tasks, &data, 3, 2).unwrap();
        assert_eq!(result.forecast().unwrap().values.len(), 3);

        let strict = f.forecast_with(Metric::Tasks, &data, 7, 7).unwrap();
        assert!(!strict.is_available());
    }

    #[test]
    fn test_deterministic() {
        let data = series(&[3.0, 7.0, 2.0, 9.0, 4.0, 6.0]);
        let a = forecaster().forecast(Metric::Workload, &data);
        let b = forecaster().forecast(Metric::Workload, &data);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unavailable_serializes_with_status() {
        let result = forecaster().forecast(Metric::Tasks, &series(&[1.0]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"]["status"], "unavailable");
        assert_eq!(json["outcome"]["required_points"], 3);
    }
}
