// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Task log ingestion from JSON
//!
//! A log is a JSON array of task objects. Each element is decoded on its own
//! so one bad row never discards the rest of the file.

use crate::models::TaskRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// An element of the input array that could not be decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub index: usize,
    pub reason: String,
}

/// Decoded task log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    pub records: Vec<TaskRecord>,
    pub rejected: Vec<RejectedRow>,
    /// Indices of decoded rows that carried no priority and were scored as medium
    #[serde(default)]
    pub defaulted_priority: Vec<usize>,
}

impl TaskLog {
    /// Decode a JSON array of task records
    pub fn from_json_str(input: &str) -> Result<Self> {
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(input).context("Task log must be a JSON array")?;

        let mut log = TaskLog::default();
        for (index, row) in rows.into_iter().enumerate() {
            let has_priority = row.get("priority").is_some_and(|p| !p.is_null());
            match serde_json::from_value::<TaskRecord>(row) {
                Ok(record) => {
                    if !has_priority {
                        log.defaulted_priority.push(index);
                    }
                    log.records.push(record);
                }
                Err(e) => log.rejected.push(RejectedRow {
                    index,
                    reason: e.to_string(),
                }),
            }
        }

        if !log.rejected.is_empty() {
            warn!(
                task_log.rejected = log.rejected.len(),
                task_log.first_reason = %log.rejected[0].reason,
                "Rejected undecodable task log rows"
            );
        }
        if !log.defaulted_priority.is_empty() {
            warn!(
                task_log.defaulted_priority = log.defaulted_priority.len(),
                "Task log rows without a priority were scored as medium"
            );
        }
        debug!(task_log.records = log.records.len(), "Task log decoded");
        Ok(log)
    }

    /// Read and decode a task log file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read task log: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse task log: {}", path.display()))
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Hex SHA-256 of the decoded records, for callers that memoize reports
    pub fn fingerprint(&self) -> Result<String> {
        let canonical =
            serde_json::to_vec(&self.records).context("Failed to serialize task records")?;
        let digest = Sha256::digest(&canonical);

        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            write!(hex, "{:02x}", byte).context("Failed to format fingerprint")?;
        }
        Ok(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
        {"date": "2024-03-01", "name": "Plan", "duration_minutes": 60, "completed": true, "priority": "High", "category": "Work"},
        {"date": "2024-03-01", "name": "Broken", "duration_minutes": "long"},
        {"date": null, "name": "Undated", "duration_minutes": 30, "completed": false, "priority": "low", "category": "Personal"},
        {"date": "2024-03-02", "name": "Bad priority", "duration_minutes": 30, "priority": "urgent"}
    ]"#;

    #[test]
    fn test_rows_decoded_independently() {
        let log = TaskLog::from_json_str(SAMPLE).unwrap();

        assert_eq!(log.records.len(), 2);
        assert_eq!(log.rejected_count(), 2);
        assert_eq!(log.rejected[0].index, 1);
        assert_eq!(log.rejected[1].index, 3);
        assert_eq!(log.records[0].priority, Priority::High);
        assert!(log.records[1].date.is_none());
    }

    #[test]
    fn test_missing_priority_is_reported() {
        let log = TaskLog::from_json_str(
            r#"[
            {"date": "2024-03-01", "duration_minutes": 30, "priority": "low"},
            {"date": "2024-03-01", "duration_minutes": 45},
            {"date": "2024-03-02", "duration_minutes": 20, "completed": true}
        ]"#,
        )
        .unwrap();

        assert_eq!(log.records.len(), 3);
        assert_eq!(log.defaulted_priority, vec![1, 2]);
        assert_eq!(log.records[1].priority, Priority::Medium);
    }

    #[test]
    fn test_non_array_is_an_error() {
        assert!(TaskLog::from_json_str(r#"{"date": "2024-03-01"}"#).is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = TaskLog::from_json_str(SAMPLE).unwrap();
        let b = TaskLog::from_json_str(SAMPLE).unwrap();
        let fa = a.fingerprint().unwrap();

        assert_eq!(fa, b.fingerprint().unwrap());
        assert_eq!(fa.len(), 64);

        let empty = TaskLog::default();
        assert_ne!(fa, empty.fingerprint().unwrap());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", SAMPLE)?;

        let log = TaskLog::load(file.path())?;
        assert_eq!(log.records.len(), 2);
        Ok(())
    }
}
