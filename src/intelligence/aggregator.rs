// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Daily aggregation of raw task records into a contiguous time series

use super::{weekday_name, AnalysisError};
use crate::config::ScoringConfig;
use crate::logging::EngineLogger;
use crate::models::{Priority, TaskRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days shown in the weekly summary
const WEEK_DAYS: usize = 7;

/// Raw per-day tallies before scoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTotals {
    pub task_count: usize,
    pub completed_count: usize,
    pub total_hours: f64,
    pub low_count: usize,
    pub medium_count: usize,
    pub high_count: usize,
    energy_sum: f64,
    energy_n: usize,
    focus_sum: f64,
    focus_n: usize,
}

impl DayTotals {
    fn add(&mut self, task: &TaskRecord) {
        self.task_count += 1;
        if task.completed {
            self.completed_count += 1;
        }
        self.total_hours += task.hours();
        match task.priority {
            Priority::Low => self.low_count += 1,
            Priority::Medium => self.medium_count += 1,
            Priority::High => self.high_count += 1,
        }
        if let Some(energy) = task.valid_energy() {
            self.energy_sum += f64::from(energy);
            self.energy_n += 1;
        }
        if let Some(focus) = task.valid_focus() {
            self.focus_sum += f64::from(focus);
            self.focus_n += 1;
        }
    }

    /// Completed share of tasks in percent, clamped to [0, 100]
    pub fn completion_rate(&self) -> f64 {
        if self.task_count == 0 {
            return 0.0;
        }
        (self.completed_count as f64 / self.task_count as f64 * 100.0).clamp(0.0, 100.0)
    }

    fn avg_energy(&self) -> Option<f64> {
        (self.energy_n > 0).then(|| self.energy_sum / self.energy_n as f64)
    }

    fn avg_focus(&self) -> Option<f64> {
        (self.focus_n > 0).then(|| self.focus_sum / self.focus_n as f64)
    }
}

/// Scores a day's tallies on a 0-100 scale
pub trait ProductivityScorer {
    fn score(&self, totals: &DayTotals) -> f64;
}

/// Weighted blend of completion rate, task volume and average priority
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    config: ScoringConfig,
}

impl WeightedScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    fn avg_priority_weight(&self, totals: &DayTotals) -> f64 {
        if totals.task_count == 0 {
            return 0.0;
        }
        let weighted = totals.low_count as f64 * self.config.weight_for(Priority::Low)
            + totals.medium_count as f64 * self.config.weight_for(Priority::Medium)
            + totals.high_count as f64 * self.config.weight_for(Priority::High);
        weighted / totals.task_count as f64
    }
}

impl ProductivityScorer for WeightedScorer {
    fn score(&self, totals: &DayTotals) -> f64 {
        if totals.task_count == 0 {
            return 0.0;
        }
        let completion = totals.completion_rate() / 100.0;
        let volume = (totals.task_count as f64 / self.config.daily_task_target).min(1.0);
        let priority = self.avg_priority_weight(totals);

        let score = 100.0
            * (self.config.completion_weight * completion
                + self.config.volume_weight * volume
                + self.config.priority_weight * priority);
        score.clamp(0.0, 100.0)
    }
}

/// One calendar day of rolled-up task metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub task_count: usize,
    pub completed_count: usize,
    pub total_hours: f64,
    /// Percent, 0-100
    pub completion_rate: f64,
    /// 0-100
    pub productivity_score: f64,
    pub avg_energy: Option<f64>,
    pub avg_focus: Option<f64>,
}

impl DailyAggregate {
    /// Build a day from its tallies; rates and scores are clamped to their domains
    pub fn from_totals(date: NaiveDate, totals: &DayTotals, scorer: &dyn ProductivityScorer) -> Self {
        Self {
            date,
            task_count: totals.task_count,
            completed_count: totals.completed_count,
            total_hours: totals.total_hours.max(0.0),
            completion_rate: totals.completion_rate(),
            productivity_score: scorer.score(totals).clamp(0.0, 100.0),
            avg_energy: totals.avg_energy(),
            avg_focus: totals.avg_focus(),
        }
    }

    /// A day with nothing logged
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            task_count: 0,
            completed_count: 0,
            total_hours: 0.0,
            completion_rate: 0.0,
            productivity_score: 0.0,
            avg_energy: None,
            avg_focus: None,
        }
    }

    /// Mean of whichever wellbeing ratings were logged that day
    pub fn wellbeing(&self) -> Option<f64> {
        match (self.avg_energy, self.avg_focus) {
            (Some(e), Some(f)) => Some((e + f) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

/// A record excluded from aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

impl From<&SkippedRecord> for AnalysisError {
    fn from(skipped: &SkippedRecord) -> Self {
        AnalysisError::MalformedRecord {
            index: skipped.index,
            reason: skipped.reason.clone(),
        }
    }
}

/// Output of daily aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Every day from the earliest to the latest valid record, in order
    pub days: Vec<DailyAggregate>,
    /// Number of malformed records left out
    pub skipped: usize,
    pub skipped_records: Vec<SkippedRecord>,
    /// Energy or focus ratings outside the 1-5 scale that were ignored
    pub discarded_ratings: usize,
}

/// Converts a task log into daily aggregates
pub struct DailyAggregator {
    scorer: Box<dyn ProductivityScorer>,
}

impl DailyAggregator {
    /// Aggregator using the weighted default scorer
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_scorer(WeightedScorer::new(config))
    }

    pub fn with_scorer(scorer: impl ProductivityScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
        }
    }

    /// Aggregate an unordered collection of records
    pub fn aggregate(&self, records: &[TaskRecord]) -> Aggregation {
        let mut by_day: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
        let mut skipped_records = Vec::new();
        let mut discarded_ratings = 0;

        for (index, task) in records.iter().enumerate() {
            if let Some(reason) = malformed_reason(task) {
                skipped_records.push(SkippedRecord { index, reason });
                continue;
            }
            // malformed_reason guarantees a date
            let Some(date) = task.date else { continue };

            discarded_ratings += task.invalid_rating_count();
            by_day.entry(date).or_default().add(task);
        }

        let days = self.fill_days(&by_day);
        EngineLogger::log_aggregation(days.len(), skipped_records.len(), discarded_ratings);

        Aggregation {
            days,
            skipped: skipped_records.len(),
            skipped_records,
            discarded_ratings,
        }
    }

    fn fill_days(&self, by_day: &BTreeMap<NaiveDate, DayTotals>) -> Vec<DailyAggregate> {
        let (Some(first), Some(last)) = (by_day.keys().next(), by_day.keys().next_back()) else {
            return Vec::new();
        };

        let mut days = Vec::new();
        let mut date = *first;
        loop {
            let day = match by_day.get(&date) {
                Some(totals) => DailyAggregate::from_totals(date, totals, self.scorer.as_ref()),
                None => DailyAggregate::empty(date),
            };
            days.push(day);

            if date >= *last {
                break;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        days
    }
}

fn malformed_reason(task: &TaskRecord) -> Option<String> {
    if task.date.is_none() {
        return Some("missing date".to_string());
    }
    if !task.duration_minutes.is_finite() {
        return Some("non-finite duration".to_string());
    }
    if task.duration_minutes < 0.0 {
        return Some(format!("negative duration ({})", task.duration_minutes));
    }
    None
}

/// One row of the weekly summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub hours: f64,
    pub completed: usize,
    pub total: usize,
    pub completion_rate: f64,
}

/// The last seven days of activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub days: Vec<WeeklyDay>,
    pub total_hours: f64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percent over the whole week
    pub completion_rate: f64,
}

/// Summarize the most recent seven aggregates
pub fn weekly_summary(aggregates: &[DailyAggregate]) -> WeeklySummary {
    let start = aggregates.len().saturating_sub(WEEK_DAYS);
    let days: Vec<WeeklyDay> = aggregates[start..]
        .iter()
        .map(|day| WeeklyDay {
            date: day.date,
            weekday: weekday_name(day.date).to_string(),
            hours: day.total_hours,
            completed: day.completed_count,
            total: day.task_count,
            completion_rate: day.completion_rate,
        })
        .collect();

    let total_hours: f64 = days.iter().map(|d| d.hours).sum();
    let total_tasks: usize = days.iter().map(|d| d.total).sum();
    let completed_tasks: usize = days.iter().map(|d| d.completed).sum();
    let completion_rate = if total_tasks > 0 {
        (completed_tasks as f64 / total_tasks as f64 * 100.0).min(100.0)
    } else {
        0.0
    };

    WeeklySummary {
        days,
        total_hours,
        total_tasks,
        completed_tasks,
        completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn task(date: Option<NaiveDate>, minutes: f64, completed: bool, priority: Priority) -> TaskRecord {
        TaskRecord {
            date,
            name: "task".to_string(),
            duration_minutes: minutes,
            completed,
            priority,
            category: "Work".to_string(),
            energy: None,
            focus: None,
        }
    }

    fn aggregator() -> DailyAggregator {
        DailyAggregator::new(ScoringConfig::default())
    }

    #[test]
    fn test_gap_days_are_zero_filled() {
        let records = vec![
            task(Some(day(5)), 60.0, true, Priority::High),
            task(Some(day(1)), 30.0, false, Priority::Low),
        ];

        let result = aggregator().aggregate(&records);

        assert_eq!(result.days.len(), 5);
        assert_eq!(result.days[0].date, day(1));
        assert_eq!(result.days[4].date, day(5));
        for gap in &result.days[1..4] {
            assert_eq!(gap.task_count, 0);
            assert_eq!(gap.total_hours, 0.0);
            assert_eq!(gap.productivity_score, 0.0);
        }
    }

    #[test]
    fn test_malformed_records_skipped() {
        let records = vec![
            task(None, 30.0, true, Priority::High),
            task(Some(day(2)), -5.0, true, Priority::High),
            task(Some(day(2)), f64::NAN, true, Priority::High),
            task(Some(day(2)), 60.0, true, Priority::High),
        ];

        let result = aggregator().aggregate(&records);

        assert_eq!(result.skipped, 3);
        assert_eq!(result.skipped_records[0].index, 0);
        assert_eq!(result.skipped_records[1].index, 1);
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].task_count, 1);

        let err = AnalysisError::from(&result.skipped_records[0]);
        assert!(err.to_string().contains("missing date"));
    }

    #[test]
    fn test_full_score_day() {
        let records: Vec<TaskRecord> = (0..6)
            .map(|_| task(Some(day(1)), 60.0, true, Priority::High))
            .collect();

        let result = aggregator().aggregate(&records);
        let d = &result.days[0];

        assert_eq!(d.task_count, 6);
        assert_eq!(d.total_hours, 6.0);
        assert_eq!(d.completion_rate, 100.0);
        assert!((d.productivity_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_score_formula() {
        // 1 of 2 complete, volume 2/5, weights (0.33 + 1.0) / 2
        let records = vec![
            task(Some(day(1)), 60.0, true, Priority::Low),
            task(Some(day(1)), 60.0, false, Priority::High),
        ];

        let d = &aggregator().aggregate(&records).days[0];
        let expected = 100.0 * (0.5 * 0.5 + 0.3 * 0.4 + 0.2 * (1.33 / 2.0));
        assert!((d.productivity_score - expected).abs() < 1e-9);
        assert_eq!(d.completion_rate, 50.0);
    }

    #[test]
    fn test_corrupted_completion_is_clamped() {
        let totals = DayTotals {
            task_count: 2,
            completed_count: 5,
            total_hours: 1.0,
            high_count: 2,
            ..DayTotals::default()
        };

        let d = DailyAggregate::from_totals(day(1), &totals, &WeightedScorer::new(ScoringConfig::default()));
        assert_eq!(d.completion_rate, 100.0);
        assert!(d.productivity_score <= 100.0);
    }

    #[test]
    fn test_out_of_range_ratings_discarded() {
        let mut a = task(Some(day(1)), 30.0, true, Priority::Medium);
        a.energy = Some(4);
        a.focus = Some(9);
        let mut b = task(Some(day(1)), 30.0, true, Priority::Medium);
        b.energy = Some(2);
        b.focus = Some(0);

        let result = aggregator().aggregate(&[a, b]);

        assert_eq!(result.discarded_ratings, 2);
        assert_eq!(result.days[0].avg_energy, Some(3.0));
        assert_eq!(result.days[0].avg_focus, None);
        assert_eq!(result.days[0].wellbeing(), Some(3.0));
    }

    #[test]
    fn test_empty_log() {
        let result = aggregator().aggregate(&[]);
        assert!(result.days.is_empty());
        assert_eq!(result.skipped, 0);
    }

    struct FlatScorer;

    impl ProductivityScorer for FlatScorer {
        fn score(&self, _totals: &DayTotals) -> f64 {
            42.0
        }
    }

    #[test]
    fn test_custom_scorer() {
        let records = vec![task(Some(day(1)), 30.0, false, Priority::Low)];
        let result = DailyAggregator::with_scorer(FlatScorer).aggregate(&records);
        assert_eq!(result.days[0].productivity_score, 42.0);
    }

    #[test]
    fn test_weekly_summary_uses_last_seven_days() {
        let records: Vec<TaskRecord> = (1..=10)
            .map(|d| task(Some(day(d)), 120.0, d % 2 == 0, Priority::Medium))
            .collect();
        let days = aggregator().aggregate(&records).days;

        let week = weekly_summary(&days);

        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].date, day(4));
        assert_eq!(week.days[0].weekday, "Monday");
        assert_eq!(week.total_hours, 14.0);
        assert_eq!(week.total_tasks, 7);
        assert_eq!(week.completed_tasks, 4);
        assert!((week.completion_rate - 400.0 / 7.0).abs() < 1e-9);
    }
}
