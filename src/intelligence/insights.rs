// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Textual insights derived from a forecast summary

use super::forecaster::ForecastResult;
use super::summary::ForecastSummary;
use super::TrendDirection;
use crate::config::RecommendationConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Productivity swing over the horizon, in score points, worth calling out
const NOTABLE_PRODUCTIVITY_SHIFT: f64 = 5.0;

/// An insight extracted from the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub insight_type: InsightType,

    /// Human-readable insight message
    pub message: String,

    /// Confidence level (0-100)
    pub confidence: f32,

    /// Supporting data for the insight
    pub data: Option<serde_json::Value>,
}

/// Categories of forecast insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    ProductivityTrend,
    Workload,
    Completion,
    Scheduling,
    StablePattern,
}

/// Generates insights from forecast rollups
#[derive(Debug, Clone)]
pub struct ForecastInsightGenerator {
    config: RecommendationConfig,
}

impl ForecastInsightGenerator {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Generate insights in a fixed order; empty when nothing could be forecast
    pub fn generate(&self, summary: &ForecastSummary) -> Vec<Insight> {
        if summary.available_metrics() == 0 {
            return Vec::new();
        }

        let mut insights = Vec::new();
        insights.extend(self.productivity_insight(summary));
        insights.extend(self.workload_insight(summary));
        insights.extend(self.completion_insight(summary));
        insights.extend(self.scheduling_insight(summary));

        if insights.is_empty() {
            let confidence = summary
                .results()
                .iter()
                .filter_map(|r| r.forecast())
                .map(|f| f.confidence_score)
                .fold(0.0, f64::max);
            insights.push(Insight {
                insight_type: InsightType::StablePattern,
                message: "Your productivity patterns look stable for the coming week.".to_string(),
                confidence: percent(confidence),
                data: None,
            });
        }

        insights
    }

    fn productivity_insight(&self, summary: &ForecastSummary) -> Option<Insight> {
        let rollup = summary.productivity.rollup.as_ref()?;
        if rollup.trend_magnitude <= NOTABLE_PRODUCTIVITY_SHIFT {
            return None;
        }

        let message = match rollup.trend {
            TrendDirection::Increasing => format!(
                "Productivity is forecast to rise by about {:.1} points over the next {} days.",
                rollup.trend_magnitude, summary.horizon
            ),
            TrendDirection::Decreasing => format!(
                "Productivity is forecast to fall by about {:.1} points over the next {} days.",
                rollup.trend_magnitude, summary.horizon
            ),
            TrendDirection::Stable => return None,
        };

        Some(Insight {
            insight_type: InsightType::ProductivityTrend,
            message,
            confidence: confidence_of(&summary.productivity.forecast),
            data: Some(json!({
                "trend": rollup.trend,
                "magnitude": rollup.trend_magnitude,
                "avg_forecast": rollup.avg_forecast
            })),
        })
    }

    fn workload_insight(&self, summary: &ForecastSummary) -> Option<Insight> {
        let rollup = summary.workload.rollup.as_ref()?;
        let hours = rollup.avg_daily_hours;

        let message = if hours > self.config.high_daily_hours {
            format!(
                "Your forecast workload averages {:.1} hours a day, which is heavy. Plan recovery time.",
                hours
            )
        } else if hours < self.config.light_daily_hours {
            format!(
                "Your forecast workload averages {:.1} hours a day, leaving room for more focused work.",
                hours
            )
        } else {
            return None;
        };

        Some(Insight {
            insight_type: InsightType::Workload,
            message,
            confidence: confidence_of(&summary.workload.forecast),
            data: Some(json!({
                "avg_daily_hours": hours,
                "busiest_day": rollup.busiest_day,
                "busiest_hours": rollup.busiest_hours
            })),
        })
    }

    fn completion_insight(&self, summary: &ForecastSummary) -> Option<Insight> {
        let rollup = summary.completion.rollup.as_ref()?;
        let rate = rollup.avg_rate;

        let message = if rate < self.config.low_completion_rate {
            format!(
                "Forecast completion rate is {:.0}%. Fewer, smaller tasks per day may help.",
                rate
            )
        } else if rate > self.config.excellent_completion_rate {
            format!("Forecast completion rate is {:.0}%, an excellent pace.", rate)
        } else {
            return None;
        };

        Some(Insight {
            insight_type: InsightType::Completion,
            message,
            confidence: confidence_of(&summary.completion.forecast),
            data: Some(json!({ "avg_rate": rate, "best_day": rollup.best_day })),
        })
    }

    fn scheduling_insight(&self, summary: &ForecastSummary) -> Option<Insight> {
        let productivity = summary.productivity.rollup.as_ref()?;
        let workload = summary.workload.rollup.as_ref()?;
        // a flat forecast has no meaningful peak day
        let productivity_peaks = productivity.best_day_score > productivity.worst_day_score;
        let workload_peaks = workload.busiest_hours > workload.avg_daily_hours;
        if !(productivity_peaks && workload_peaks) || productivity.best_day != workload.busiest_day {
            return None;
        }

        Some(Insight {
            insight_type: InsightType::Scheduling,
            message: format!(
                "{} is forecast to be both your most productive and your busiest day. Keep it for high-priority work.",
                productivity.best_day
            ),
            confidence: confidence_of(&summary.productivity.forecast)
                .min(confidence_of(&summary.workload.forecast)),
            data: Some(json!({ "day": productivity.best_day })),
        })
    }
}

fn confidence_of(result: &ForecastResult) -> f32 {
    percent(result.forecast().map_or(0.0, |f| f.confidence_score))
}

fn percent(score: f64) -> f32 {
    (score * 100.0).clamp(0.0, 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::intelligence::aggregator::DailyAggregate;
    use crate::intelligence::summary::SummaryBuilder;
    use chrono::NaiveDate;

    fn days(hours: &[f64], rates: &[f64], scores: &[f64]) -> Vec<DailyAggregate> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        hours
            .iter()
            .zip(rates)
            .zip(scores)
            .enumerate()
            .map(|(i, ((h, r), s))| DailyAggregate {
                date: start + chrono::Duration::days(i as i64),
                task_count: 4,
                completed_count: 3,
                total_hours: *h,
                completion_rate: *r,
                productivity_score: *s,
                avg_energy: None,
                avg_focus: None,
            })
            .collect()
    }

    fn summarize(aggregates: &[DailyAggregate]) -> ForecastSummary {
        SummaryBuilder::new(ForecastConfig::default(), RecommendationConfig::default())
            .unwrap()
            .summarize(aggregates)
    }

    fn types(summary: &ForecastSummary) -> Vec<InsightType> {
        summary.insights.iter().map(|i| i.insight_type).collect()
    }

    #[test]
    fn test_no_insights_without_forecasts() {
        let summary = summarize(&days(&[5.0], &[70.0], &[60.0]));
        assert!(summary.insights.is_empty());
    }

    #[test]
    fn test_stable_fallback() {
        let summary = summarize(&days(
            &[6.0, 5.0, 6.0, 5.0, 6.0, 5.0, 6.0],
            &[70.0; 7],
            &[60.0, 62.0, 60.0, 62.0, 60.0, 62.0, 60.0],
        ));
        assert_eq!(types(&summary), vec![InsightType::StablePattern]);
    }

    #[test]
    fn test_heavy_workload_and_low_completion() {
        let summary = summarize(&days(
            &[10.0; 7],
            &[50.0; 7],
            &[40.0, 42.0, 40.0, 42.0, 40.0, 42.0, 40.0],
        ));
        let found = types(&summary);
        assert!(found.contains(&InsightType::Workload));
        assert!(found.contains(&InsightType::Completion));
        assert!(summary.insights[0].message.contains("heavy"));
    }

    #[test]
    fn test_shared_peak_day() {
        let rising = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let scores = [40.0, 41.0, 42.0, 43.0, 44.0, 45.0, 46.0];
        let summary = summarize(&days(&rising, &[70.0; 7], &scores));

        assert!(types(&summary).contains(&InsightType::Scheduling));
        let scheduling = summary
            .insights
            .iter()
            .find(|i| i.insight_type == InsightType::Scheduling)
            .unwrap();
        assert!(scheduling.message.starts_with("Sunday"));
    }

    #[test]
    fn test_rising_productivity() {
        let summary = summarize(&days(
            &[5.0; 7],
            &[70.0; 7],
            &[40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0],
        ));
        let first = &summary.insights[0];
        assert_eq!(first.insight_type, InsightType::ProductivityTrend);
        assert!(first.message.contains("rise"));
    }
}
