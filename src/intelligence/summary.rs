// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Forecast summary: the four metric forecasts under fixed keys with scalar rollups

use super::aggregator::DailyAggregate;
use super::forecaster::{Forecast, ForecastResult, MetricForecaster};
use super::insights::{ForecastInsightGenerator, Insight};
use super::{weekday_name, AnalysisError, DataPoint, Metric, TrendDirection};
use crate::config::{ForecastConfig, RecommendationConfig};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A metric's forecast plus its rollup, absent when the forecast is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOutlook<R> {
    pub forecast: ForecastResult,
    pub rollup: Option<R>,
}

impl<R> MetricOutlook<R> {
    pub fn trend(&self) -> Option<TrendDirection> {
        self.forecast.trend()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRollup {
    pub avg_forecast: f64,
    pub trend: TrendDirection,
    /// Absolute change between the first and last forecast day
    pub trend_magnitude: f64,
    pub best_day: String,
    pub best_day_score: f64,
    pub worst_day: String,
    pub worst_day_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRollup {
    pub avg_forecast: f64,
    pub trend: TrendDirection,
    pub total_hours_forecast: f64,
    pub avg_daily_hours: f64,
    pub busiest_day: String,
    pub busiest_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRollup {
    pub avg_forecast: f64,
    pub trend: TrendDirection,
    pub avg_daily_tasks: f64,
    /// Sum of per-day counts rounded to whole tasks
    pub total_tasks_forecast: u64,
    pub peak_day: String,
    pub peak_tasks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRollup {
    pub avg_forecast: f64,
    pub trend: TrendDirection,
    pub avg_rate: f64,
    pub best_day: String,
    pub best_rate: f64,
}

/// Nested forecast summary
///
/// Consumers read each metric through its own key; there is no flat view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub horizon: usize,
    pub forecast_start: Option<NaiveDate>,
    pub forecast_end: Option<NaiveDate>,
    pub productivity: MetricOutlook<ProductivityRollup>,
    pub workload: MetricOutlook<WorkloadRollup>,
    pub tasks: MetricOutlook<TaskRollup>,
    pub completion: MetricOutlook<CompletionRollup>,
    pub insights: Vec<Insight>,
}

impl ForecastSummary {
    /// Forecast results in fixed metric order
    pub fn results(&self) -> [&ForecastResult; 4] {
        [
            &self.productivity.forecast,
            &self.workload.forecast,
            &self.tasks.forecast,
            &self.completion.forecast,
        ]
    }

    /// Number of metrics with a produced forecast
    pub fn available_metrics(&self) -> usize {
        self.results().iter().filter(|r| r.is_available()).count()
    }
}

/// Builds a [`ForecastSummary`] from daily aggregates
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    forecaster: MetricForecaster,
    insights: ForecastInsightGenerator,
}

impl SummaryBuilder {
    pub fn new(
        forecast: ForecastConfig,
        recommendations: RecommendationConfig,
    ) -> Result<Self, AnalysisError> {
        recommendations.validate()?;
        Ok(Self {
            forecaster: MetricForecaster::new(forecast)?,
            insights: ForecastInsightGenerator::new(recommendations),
        })
    }

    pub fn forecaster(&self) -> &MetricForecaster {
        &self.forecaster
    }

    /// Forecast every metric and assemble the summary
    pub fn summarize(&self, aggregates: &[DailyAggregate]) -> ForecastSummary {
        let horizon = self.forecaster.config().horizon;
        let run = |metric: Metric| self.forecaster.forecast(metric, &metric.series(aggregates));

        let productivity = run(Metric::Productivity);
        let workload = run(Metric::Workload);
        let tasks = run(Metric::Tasks);
        let completion = run(Metric::Completion);

        let last_date = aggregates.last().map(|d| d.date);
        let mut summary = ForecastSummary {
            horizon,
            forecast_start: last_date.and_then(|d| d.checked_add_days(Days::new(1))),
            forecast_end: last_date.and_then(|d| d.checked_add_days(Days::new(horizon as u64))),
            productivity: MetricOutlook {
                rollup: productivity.forecast().and_then(productivity_rollup),
                forecast: productivity,
            },
            workload: MetricOutlook {
                rollup: workload.forecast().and_then(workload_rollup),
                forecast: workload,
            },
            tasks: MetricOutlook {
                rollup: tasks.forecast().and_then(task_rollup),
                forecast: tasks,
            },
            completion: MetricOutlook {
                rollup: completion.forecast().and_then(completion_rollup),
                forecast: completion,
            },
            insights: Vec::new(),
        };
        summary.insights = self.insights.generate(&summary);
        summary
    }
}

/// First point with the highest value
fn highest(values: &[DataPoint]) -> Option<&DataPoint> {
    values.iter().fold(None, |best: Option<&DataPoint>, p| match best {
        Some(b) if b.value >= p.value => Some(b),
        _ => Some(p),
    })
}

/// First point with the lowest value
fn lowest(values: &[DataPoint]) -> Option<&DataPoint> {
    values.iter().fold(None, |worst: Option<&DataPoint>, p| match worst {
        Some(w) if w.value <= p.value => Some(w),
        _ => Some(p),
    })
}

fn productivity_rollup(forecast: &Forecast) -> Option<ProductivityRollup> {
    let first = forecast.values.first()?;
    let last = forecast.values.last()?;
    let best = highest(&forecast.values)?;
    let worst = lowest(&forecast.values)?;

    Some(ProductivityRollup {
        avg_forecast: forecast.average(),
        trend: forecast.trend,
        trend_magnitude: (last.value - first.value).abs(),
        best_day: weekday_name(best.date).to_string(),
        best_day_score: best.value,
        worst_day: weekday_name(worst.date).to_string(),
        worst_day_score: worst.value,
    })
}

fn workload_rollup(forecast: &Forecast) -> Option<WorkloadRollup> {
    let busiest = highest(&forecast.values)?;
    let avg = forecast.average();

    Some(WorkloadRollup {
        avg_forecast: avg,
        trend: forecast.trend,
        total_hours_forecast: forecast.total(),
        avg_daily_hours: avg,
        busiest_day: weekday_name(busiest.date).to_string(),
        busiest_hours: busiest.value,
    })
}

fn task_rollup(forecast: &Forecast) -> Option<TaskRollup> {
    let peak = highest(&forecast.values)?;
    let avg = forecast.average();

    Some(TaskRollup {
        avg_forecast: avg,
        trend: forecast.trend,
        avg_daily_tasks: avg,
        total_tasks_forecast: forecast.values.iter().map(|p| p.value.round() as u64).sum(),
        peak_day: weekday_name(peak.date).to_string(),
        peak_tasks: peak.value.round() as u64,
    })
}

fn completion_rollup(forecast: &Forecast) -> Option<CompletionRollup> {
    let best = highest(&forecast.values)?;
    let avg = forecast.average();

    Some(CompletionRollup {
        avg_forecast: avg,
        trend: forecast.trend,
        avg_rate: avg,
        best_day: weekday_name(best.date).to_string(),
        best_rate: best.value,
    })
}
