// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end productivity analysis pipeline

use super::aggregator::{weekly_summary, Aggregation, DailyAggregator, WeeklySummary};
use super::burnout::{BurnoutAssessment, BurnoutAssessor};
use super::recommendation_engine::{AcceptanceRatios, Recommendation, RecommendationGenerator};
use super::summary::{ForecastSummary, SummaryBuilder};
use super::AnalysisError;
use crate::config::EngineConfig;
use crate::logging::EngineLogger;
use crate::models::TaskRecord;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything the engine derives from one task log snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityReport {
    pub aggregation: Aggregation,
    pub summary: ForecastSummary,
    pub burnout: BurnoutAssessment,
    pub recommendations: Vec<Recommendation>,
    pub weekly: WeeklySummary,
}

/// Runs aggregation, forecasting, risk assessment and recommendation in order
pub struct ProductivityAnalyzer {
    aggregator: DailyAggregator,
    summary: SummaryBuilder,
    burnout: BurnoutAssessor,
    recommendations: RecommendationGenerator,
}

impl ProductivityAnalyzer {
    /// Build the pipeline; an invalid configuration is rejected here
    pub fn new(config: EngineConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            aggregator: DailyAggregator::new(config.scoring),
            summary: SummaryBuilder::new(config.forecast, config.recommendations.clone())?,
            burnout: BurnoutAssessor::new(config.burnout)?,
            recommendations: RecommendationGenerator::new(config.recommendations)?,
        })
    }

    /// Replace the daily aggregator, e.g. to plug in a different scorer
    pub fn with_aggregator(mut self, aggregator: DailyAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Analyze a task log snapshot
    pub fn analyze(
        &self,
        records: &[TaskRecord],
        feedback: Option<&AcceptanceRatios>,
    ) -> ProductivityReport {
        let started = Instant::now();

        let aggregation = self.aggregator.aggregate(records);
        let summary = self.summary.summarize(&aggregation.days);
        let burnout = self.burnout.assess(&aggregation.days);
        let recommendations = self.recommendations.generate(&summary, &burnout, feedback);
        let weekly = weekly_summary(&aggregation.days);

        EngineLogger::log_pipeline_run(
            records.len(),
            aggregation.days.len(),
            burnout.risk_level.as_str(),
            started.elapsed().as_millis() as u64,
        );

        ProductivityReport {
            aggregation,
            summary,
            burnout,
            recommendations,
            weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::burnout::RiskLevel;
    use crate::models::Priority;
    use chrono::NaiveDate;

    fn records(days: u32) -> Vec<TaskRecord> {
        (1..=days)
            .flat_map(|d| {
                (0..3).map(move |i| TaskRecord {
                    date: NaiveDate::from_ymd_opt(2024, 4, d),
                    name: format!("task {}", i),
                    duration_minutes: 90.0,
                    completed: i < 2,
                    priority: Priority::Medium,
                    category: "Work".to_string(),
                    energy: Some(3),
                    focus: Some(4),
                })
            })
            .collect()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.forecast.horizon = 0;
        assert!(matches!(
            ProductivityAnalyzer::new(config),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_pipeline_wires_components() {
        let analyzer = ProductivityAnalyzer::new(EngineConfig::default()).unwrap();
        let report = analyzer.analyze(&records(8), None);

        assert_eq!(report.aggregation.days.len(), 8);
        assert_eq!(report.summary.available_metrics(), 4);
        assert_eq!(report.burnout.risk_level, RiskLevel::Low);
        assert_eq!(report.weekly.days.len(), 7);
        assert_eq!(report.weekly.total_tasks, 21);
    }

    #[test]
    fn test_empty_log_produces_empty_report() {
        let analyzer = ProductivityAnalyzer::new(EngineConfig::default()).unwrap();
        let report = analyzer.analyze(&[], None);

        assert!(report.aggregation.days.is_empty());
        assert_eq!(report.summary.available_metrics(), 0);
        assert!(report.summary.forecast_start.is_none());
        assert_eq!(report.burnout.risk_level, RiskLevel::Low);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let analyzer = ProductivityAnalyzer::new(EngineConfig::default()).unwrap();
        let log = records(5);
        assert_eq!(analyzer.analyze(&log, None), analyzer.analyze(&log, None));
    }
}
