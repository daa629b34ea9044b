// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Compiled-in defaults for the forecasting engine and the names of the
//! environment variables that may override them.

/// Service identity used in logs and CLI output
pub mod service {
    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

    pub const SERVICE_NAME: &str = "neurotrack";
}

/// Default values for every configurable engine parameter
pub mod defaults {
    /// Number of future days to extrapolate
    pub const FORECAST_HORIZON: usize = 7;
    /// Minimum observed days before a metric is forecast
    pub const MIN_FORECAST_POINTS: usize = 3;
    /// History length at which a forecast is no longer flagged low-confidence
    pub const FULL_CONFIDENCE_DAYS: usize = 7;
    /// Most recent days fed to the forecaster
    pub const LOOKBACK_DAYS: usize = 30;
    /// Fraction of the series' spread the fitted slope must explain to count as a trend
    pub const TREND_SENSITIVITY: f64 = 0.25;
    /// Absolute slope floor so float noise on constant series never reads as a trend
    pub const SLOPE_FLOOR: f64 = 1e-9;

    /// Expected number of tasks per day for the volume component
    pub const DAILY_TASK_TARGET: f64 = 5.0;
    pub const COMPLETION_WEIGHT: f64 = 0.5;
    pub const VOLUME_WEIGHT: f64 = 0.3;
    pub const PRIORITY_WEIGHT: f64 = 0.2;
    pub const LOW_PRIORITY_WEIGHT: f64 = 0.33;
    pub const MEDIUM_PRIORITY_WEIGHT: f64 = 0.66;
    pub const HIGH_PRIORITY_WEIGHT: f64 = 1.0;

    /// Rolling window for burnout assessment
    pub const BURNOUT_WINDOW_DAYS: usize = 7;
    /// Daily hours above which a day counts toward sustained workload
    pub const WORKLOAD_HOURS_THRESHOLD: f64 = 6.0;
    /// Share of the window that must exceed the hours threshold
    pub const SUSTAINED_FRACTION: f64 = 0.6;
    /// Active days needed before a within-window trend is trusted
    pub const MIN_TREND_POINTS: usize = 3;
    pub const SIGNAL_WEIGHT: f64 = 1.0;
    pub const MEDIUM_RISK_AT: f64 = 1.0;
    pub const HIGH_RISK_AT: f64 = 2.0;

    pub const HIGH_DAILY_HOURS: f64 = 9.0;
    pub const LIGHT_DAILY_HOURS: f64 = 4.0;
    pub const LOW_COMPLETION_RATE: f64 = 60.0;
    pub const EXCELLENT_COMPLETION_RATE: f64 = 85.0;
    /// Rank bonus for a fully accepted category; stays below one severity step
    pub const ACCEPTANCE_WEIGHT: f64 = 0.5;

    /// Valid range for energy and focus self-ratings
    pub const RATING_MIN: u8 = 1;
    pub const RATING_MAX: u8 = 5;
}

/// Environment variable names recognised by [`crate::config::environment`]
pub mod env_vars {
    pub const CONFIG_PATH: &str = "NEUROTRACK_CONFIG";
    pub const FORECAST_HORIZON: &str = "NEUROTRACK_FORECAST_HORIZON";
    pub const MIN_FORECAST_POINTS: &str = "NEUROTRACK_MIN_FORECAST_POINTS";
    pub const LOOKBACK_DAYS: &str = "NEUROTRACK_LOOKBACK_DAYS";
    pub const DAILY_TASK_TARGET: &str = "NEUROTRACK_DAILY_TASK_TARGET";
    pub const BURNOUT_WINDOW_DAYS: &str = "NEUROTRACK_BURNOUT_WINDOW_DAYS";
    pub const WORKLOAD_HOURS_THRESHOLD: &str = "NEUROTRACK_WORKLOAD_HOURS_THRESHOLD";
}

/// Default on-disk locations
pub mod paths {
    /// Config file looked up in the working directory
    pub const LOCAL_CONFIG_FILE: &str = "neurotrack.toml";
    /// Config file under the platform config directory
    pub const USER_CONFIG_FILE: &str = "neurotrack/config.toml";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_sum_to_one() {
        let total = defaults::COMPLETION_WEIGHT + defaults::VOLUME_WEIGHT + defaults::PRIORITY_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_acceptance_weight_below_severity_step() {
        assert!(defaults::ACCEPTANCE_WEIGHT < 1.0);
    }

    #[test]
    fn test_relaxed_minimum_is_below_full_confidence() {
        assert!(defaults::MIN_FORECAST_POINTS < defaults::FULL_CONFIDENCE_DAYS);
    }
}
