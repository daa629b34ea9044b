// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core record types read by the engine. A task log is a flat list of
//! [`TaskRecord`]s as written by the tracking front end; the engine never
//! mutates them.
//!
//! ## Core Models
//!
//! - [`TaskRecord`]: one logged unit of work
//! - [`Priority`]: low / medium / high importance of a task

use crate::constants::defaults::{RATING_MAX, RATING_MIN};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single logged task
///
/// # Examples
///
/// ```rust
/// use neurotrack::models::{Priority, TaskRecord};
/// use chrono::NaiveDate;
///
/// let task = TaskRecord {
///     date: NaiveDate::from_ymd_opt(2024, 3, 4),
///     name: "Write report".to_string(),
///     duration_minutes: 90.0,
///     completed: true,
///     priority: Priority::High,
///     category: "Work".to_string(),
///     energy: Some(4),
///     focus: None,
/// };
/// assert_eq!(task.hours(), 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Calendar day the task was logged on; absent dates are malformed
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Free-text task name
    #[serde(default)]
    pub name: String,
    /// Time spent in minutes
    #[serde(alias = "duration")]
    pub duration_minutes: f64,
    /// Whether the task was finished
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form label (Work, Study, Personal, ...)
    #[serde(default)]
    pub category: String,
    /// Self-reported energy, 1-5
    #[serde(default)]
    pub energy: Option<u8>,
    /// Self-reported focus, 1-5
    #[serde(default)]
    pub focus: Option<u8>,
}

impl TaskRecord {
    /// Duration converted to hours
    pub fn hours(&self) -> f64 {
        self.duration_minutes / 60.0
    }

    /// Energy rating if it lies in the accepted scale
    pub fn valid_energy(&self) -> Option<u8> {
        self.energy.filter(|v| is_valid_rating(*v))
    }

    /// Focus rating if it lies in the accepted scale
    pub fn valid_focus(&self) -> Option<u8> {
        self.focus.filter(|v| is_valid_rating(*v))
    }

    /// Number of ratings present but outside the 1-5 scale
    pub fn invalid_rating_count(&self) -> usize {
        [self.energy, self.focus]
            .iter()
            .flatten()
            .filter(|v| !is_valid_rating(**v))
            .count()
    }
}

/// Whether a self-rating is inside the 1-5 scale
pub fn is_valid_rating(value: u8) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&value)
}

/// Task importance
///
/// Deserialization is case-insensitive so both `"High"` and `"high"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised priority label
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown priority '{0}' (expected low, medium or high)")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = UnknownPriority;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
