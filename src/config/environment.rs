// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-variable overrides applied on top of a loaded engine configuration

use super::EngineConfig;
use crate::constants::env_vars;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use tracing::{debug, warn};

/// Load `.env` (if present) and apply `NEUROTRACK_*` overrides from the process environment
pub fn apply_env_overrides(config: &mut EngineConfig) -> Result<()> {
    if let Err(e) = dotenv::dotenv() {
        debug!("No .env file loaded: {}", e);
    }
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut EngineConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(horizon) = parse_var(&lookup, env_vars::FORECAST_HORIZON)? {
        config.forecast.horizon = horizon;
    }
    if let Some(min_points) = parse_var(&lookup, env_vars::MIN_FORECAST_POINTS)? {
        config.forecast.min_points = min_points;
    }
    if let Some(lookback) = parse_var(&lookup, env_vars::LOOKBACK_DAYS)? {
        config.forecast.lookback_days = lookback;
    }
    if let Some(target) = parse_var(&lookup, env_vars::DAILY_TASK_TARGET)? {
        config.scoring.daily_task_target = target;
    }
    if let Some(window) = parse_var(&lookup, env_vars::BURNOUT_WINDOW_DAYS)? {
        config.burnout.window_days = window;
    }
    if let Some(threshold) = parse_var(&lookup, env_vars::WORKLOAD_HOURS_THRESHOLD)? {
        config.burnout.workload_hours_threshold = threshold;
    }
    Ok(())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => {
            warn!(env.key = %key, "Ignoring empty environment override");
            Ok(None)
        }
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {} value: {}", key, raw))?;
            debug!(env.key = %key, env.value = %raw.trim(), "Applied environment override");
            Ok(Some(value))
        }
    }
}
