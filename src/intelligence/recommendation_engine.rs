// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recommendation generation from forecasts and burnout risk
//!
//! One recommendation is produced per trigger that holds; nothing is emitted
//! for absent triggers. Ordering is by severity, then by how often the user
//! accepted past recommendations of the same category.

use super::burnout::{BurnoutAssessment, BurnoutFactor, RiskLevel};
use super::summary::ForecastSummary;
use super::{AnalysisError, TrendDirection};
use crate::config::RecommendationConfig;
use crate::logging::EngineLogger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category → share of past recommendations rated thumbs-up (0-1)
pub type AcceptanceRatios = BTreeMap<RecommendationCategory, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Workload,
    Focus,
    Schedule,
    Risk,
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationCategory::Workload => "workload",
            RecommendationCategory::Focus => "focus",
            RecommendationCategory::Schedule => "schedule",
            RecommendationCategory::Risk => "risk",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    /// Positive reinforcement
    Positive,
}

impl Severity {
    /// Base rank; steps are one apart so feedback never outranks severity
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 3.0,
            Severity::Warning => 2.0,
            Severity::Info => 1.0,
            Severity::Positive => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Up,
    Down,
}

/// User reaction attached to a delivered recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: Rating,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub category: RecommendationCategory,
    pub severity: Severity,
    /// Ordering weight, higher first
    pub rank: f64,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

impl Recommendation {
    fn new(category: RecommendationCategory, severity: Severity, text: String) -> Self {
        Self {
            text,
            category,
            severity,
            rank: severity.weight(),
            feedback: None,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.severity == Severity::Positive
    }
}

/// Turns a forecast summary and a risk assessment into ranked recommendations
#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    config: RecommendationConfig,
}

impl RecommendationGenerator {
    pub fn new(config: RecommendationConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn generate(
        &self,
        summary: &ForecastSummary,
        risk: &BurnoutAssessment,
        feedback: Option<&AcceptanceRatios>,
    ) -> Vec<Recommendation> {
        let mut recommendations = self.triggered(summary, risk);

        for rec in &mut recommendations {
            let acceptance = feedback
                .and_then(|ratios| ratios.get(&rec.category))
                .copied()
                .filter(|r| r.is_finite())
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            rec.rank = rec.severity.weight() + acceptance * self.config.acceptance_weight;
        }
        // stable: equal ranks keep trigger order
        recommendations.sort_by(|a, b| b.rank.total_cmp(&a.rank));

        EngineLogger::log_recommendations(recommendations.len(), feedback.is_some());
        recommendations
    }

    fn triggered(&self, summary: &ForecastSummary, risk: &BurnoutAssessment) -> Vec<Recommendation> {
        use RecommendationCategory::*;

        let mut out = Vec::new();

        match risk.risk_level {
            RiskLevel::High => out.push(Recommendation::new(
                Workload,
                Severity::Critical,
                format!(
                    "Burnout risk is high ({}). Reduce your daily workload and protect time for rest this week.",
                    risk.factor_names().join(", ")
                ),
            )),
            RiskLevel::Medium => out.push(Recommendation::new(
                Risk,
                Severity::Warning,
                format!(
                    "Early burnout warning ({}). Keep an eye on your hours and take regular breaks.",
                    risk.factor_names().join(", ")
                ),
            )),
            RiskLevel::Low => {}
        }

        if risk.has_factor(BurnoutFactor::DecliningWellbeing) {
            out.push(Recommendation::new(
                Focus,
                Severity::Warning,
                "Your energy and focus ratings are dropping. Schedule short breaks between deep-work blocks."
                    .to_string(),
            ));
        }

        if summary.completion.trend() == Some(TrendDirection::Decreasing) {
            out.push(Recommendation::new(
                Schedule,
                Severity::Warning,
                "Your completion rate is trending down. Plan fewer tasks per day and finish before starting new ones."
                    .to_string(),
            ));
        }

        if let Some(workload) = &summary.workload.rollup {
            if workload.trend == TrendDirection::Increasing {
                out.push(Recommendation::new(
                    Workload,
                    Severity::Warning,
                    format!(
                        "Your workload is rising, with {} forecast to reach {:.1} hours. Consider delegating or deferring low-priority tasks.",
                        workload.busiest_day, workload.busiest_hours
                    ),
                ));
            } else if workload.avg_daily_hours > self.config.high_daily_hours {
                out.push(Recommendation::new(
                    Workload,
                    Severity::Warning,
                    format!(
                        "You are forecast to work {:.1} hours a day. Cap your day and move non-essential work.",
                        workload.avg_daily_hours
                    ),
                ));
            } else if workload.avg_daily_hours < self.config.light_daily_hours {
                out.push(Recommendation::new(
                    Schedule,
                    Severity::Info,
                    format!(
                        "Your forecast workload is light ({:.1} hours a day). Use the spare capacity for a priority project.",
                        workload.avg_daily_hours
                    ),
                ));
            }
        }

        if summary.productivity.trend() == Some(TrendDirection::Decreasing) {
            out.push(Recommendation::new(
                Focus,
                Severity::Info,
                "Productivity is forecast to slip. Block your most productive hours for high-priority tasks."
                    .to_string(),
            ));
        }

        if let Some(completion) = &summary.completion.rollup {
            if completion.avg_rate < self.config.low_completion_rate {
                out.push(Recommendation::new(
                    Schedule,
                    Severity::Info,
                    format!(
                        "Only {:.0}% of tasks are forecast to be completed. Break large tasks into smaller steps.",
                        completion.avg_rate
                    ),
                ));
            }
        }

        if risk.risk_level == RiskLevel::Low {
            let excellent_completion = summary
                .completion
                .rollup
                .as_ref()
                .is_some_and(|c| c.avg_rate > self.config.excellent_completion_rate);
            let rising_productivity = summary.productivity.trend() == Some(TrendDirection::Increasing);

            if excellent_completion || rising_productivity {
                out.push(Recommendation::new(
                    Focus,
                    Severity::Positive,
                    "You're on a strong streak. Keep your current routine going.".to_string(),
                ));
            }
        }

        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCount {
    pub accepted: u32,
    pub total: u32,
}

/// Running per-category feedback tallies
///
/// This is the only state carried between runs; the host owns and persists it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLedger {
    counts: BTreeMap<RecommendationCategory, FeedbackCount>,
}

impl FeedbackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a recommendation's feedback; returns false when it carries none
    pub fn record(&mut self, recommendation: &Recommendation) -> bool {
        let Some(feedback) = &recommendation.feedback else {
            return false;
        };
        let entry = self.counts.entry(recommendation.category).or_default();
        entry.total += 1;
        if feedback.rating == Rating::Up {
            entry.accepted += 1;
        }
        true
    }

    pub fn count(&self, category: RecommendationCategory) -> FeedbackCount {
        self.counts.get(&category).copied().unwrap_or_default()
    }

    /// Acceptance ratio for every category with at least one rating
    pub fn acceptance_ratios(&self) -> AcceptanceRatios {
        self.counts
            .iter()
            .filter(|(_, c)| c.total > 0)
            .map(|(category, c)| (*category, f64::from(c.accepted) / f64::from(c.total)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForecastConfig, RecommendationConfig};
    use crate::intelligence::aggregator::DailyAggregate;
    use crate::intelligence::burnout::WindowMetrics;
    use crate::intelligence::summary::SummaryBuilder;
    use chrono::NaiveDate;

    fn summary_for(hours: &[f64], rates: &[f64], scores: &[f64]) -> ForecastSummary {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let days: Vec<DailyAggregate> = hours
            .iter()
            .zip(rates)
            .zip(scores)
            .enumerate()
            .map(|(i, ((h, r), s))| DailyAggregate {
                date: start + chrono::Duration::days(i as i64),
                task_count: 5,
                completed_count: 4,
                total_hours: *h,
                completion_rate: *r,
                productivity_score: *s,
                avg_energy: None,
                avg_focus: None,
            })
            .collect();
        SummaryBuilder::new(ForecastConfig::default(), RecommendationConfig::default())
            .unwrap()
            .summarize(&days)
    }

    fn risk(level: RiskLevel, factors: Vec<BurnoutFactor>) -> BurnoutAssessment {
        BurnoutAssessment {
            risk_level: level,
            risk_score: factors.len() as f64,
            contributing_factors: factors,
            window_days: 7,
            days_considered: 7,
            reduced_confidence: false,
            metrics: WindowMetrics::default(),
        }
    }

    fn generator() -> RecommendationGenerator {
        RecommendationGenerator::new(RecommendationConfig::default()).unwrap()
    }

    #[test]
    fn test_no_triggers_means_no_recommendations() {
        let summary = summary_for(&[6.0; 7], &[75.0; 7], &[70.0; 7]);
        let recs = generator().generate(&summary, &risk(RiskLevel::Low, vec![]), None);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_unavailable_forecasts_trigger_nothing() {
        let summary = summary_for(&[6.0], &[75.0], &[70.0]);
        let recs = generator().generate(&summary, &risk(RiskLevel::Low, vec![]), None);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_positive_reinforcement_only() {
        let summary = summary_for(&[6.0; 7], &[100.0; 7], &[100.0; 7]);
        let recs = generator().generate(&summary, &risk(RiskLevel::Low, vec![]), None);

        assert_eq!(recs.len(), 1);
        assert!(recs[0].is_positive());
    }

    #[test]
    fn test_high_risk_leads_with_workload_reduction() {
        let summary = summary_for(
            &[4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            &[90.0, 80.0, 70.0, 60.0, 55.0, 45.0, 40.0],
            &[70.0; 7],
        );
        let assessment = risk(
            RiskLevel::High,
            vec![BurnoutFactor::SustainedWorkload, BurnoutFactor::DecliningCompletion],
        );

        let recs = generator().generate(&summary, &assessment, None);

        assert_eq!(recs[0].category, RecommendationCategory::Workload);
        assert_eq!(recs[0].severity, Severity::Critical);
        assert!(recs[0].text.contains("sustained high workload"));
        assert!(recs.iter().any(|r| r.category == RecommendationCategory::Schedule));
        assert!(!recs.iter().any(|r| r.is_positive()));
        assert!(recs.windows(2).all(|w| w[0].rank >= w[1].rank));
    }

    #[test]
    fn test_feedback_reorders_within_severity() {
        // rising workload (workload, warning) and declining completion (schedule, warning)
        let summary = summary_for(
            &[4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            &[90.0, 80.0, 70.0, 60.0, 55.0, 45.0, 40.0],
            &[70.0; 7],
        );
        let assessment = risk(RiskLevel::Low, vec![]);

        let plain = generator().generate(&summary, &assessment, None);
        assert_eq!(plain[0].category, RecommendationCategory::Schedule);

        let mut ratios = AcceptanceRatios::new();
        ratios.insert(RecommendationCategory::Workload, 0.9);
        ratios.insert(RecommendationCategory::Schedule, 0.1);
        let ranked = generator().generate(&summary, &assessment, Some(&ratios));

        assert_eq!(ranked[0].category, RecommendationCategory::Workload);
        assert_eq!(ranked[0].severity, Severity::Warning);
    }

    #[test]
    fn test_feedback_never_outranks_severity() {
        let summary = summary_for(&[6.0; 7], &[100.0; 7], &[100.0; 7]);
        let assessment = risk(RiskLevel::Medium, vec![BurnoutFactor::DecliningWellbeing]);

        let mut ratios = AcceptanceRatios::new();
        ratios.insert(RecommendationCategory::Focus, 1.0);
        ratios.insert(RecommendationCategory::Risk, 0.0);

        let recs = generator().generate(&summary, &assessment, Some(&ratios));
        // risk warning then focus warning; no positive entry under medium risk
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].category, RecommendationCategory::Focus);
        assert_eq!(recs[1].category, RecommendationCategory::Risk);
        assert!(recs.iter().all(|r| r.severity == Severity::Warning));
    }

    #[test]
    fn test_feedback_ledger() {
        let mut ledger = FeedbackLedger::new();
        let mut rec = Recommendation::new(
            RecommendationCategory::Schedule,
            Severity::Info,
            "Plan fewer tasks".to_string(),
        );
        assert!(!ledger.record(&rec));

        rec.feedback = Some(Feedback {
            rating: Rating::Up,
            reason: Some("helpful".to_string()),
        });
        assert!(ledger.record(&rec));
        rec.feedback = Some(Feedback {
            rating: Rating::Down,
            reason: None,
        });
        ledger.record(&rec);
        ledger.record(&rec);

        let ratios = ledger.acceptance_ratios();
        assert!((ratios[&RecommendationCategory::Schedule] - 1.0 / 3.0).abs() < 1e-12);
        assert!(!ratios.contains_key(&RecommendationCategory::Workload));
        assert_eq!(ledger.count(RecommendationCategory::Schedule).total, 3);
    }

    #[test]
    fn test_ratios_json_uses_category_names() {
        let mut ratios = AcceptanceRatios::new();
        ratios.insert(RecommendationCategory::Focus, 0.5);
        let json = serde_json::to_string(&ratios).unwrap();
        assert_eq!(json, r#"{"focus":0.5}"#);

        let parsed: AcceptanceRatios = serde_json::from_str(r#"{"risk": 0.25}"#).unwrap();
        assert_eq!(parsed[&RecommendationCategory::Risk], 0.25);
    }
}
