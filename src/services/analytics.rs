use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::daily_log::DailyLog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityPoint {
    pub date: NaiveDate,
    pub total_time: f64,
    pub mood: i32,
    pub tasks_count: usize,
}

/// One point per day for `days` days starting at `start`; days without a log
/// are zero-filled.
pub fn productivity_series(logs: &[DailyLog], start: NaiveDate, days: i64) -> Vec<ProductivityPoint> {
    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            match logs.iter().find(|l| l.date == date) {
                Some(log) => ProductivityPoint {
                    date,
                    total_time: log.total_time,
                    mood: log.mood,
                    tasks_count: log.tasks.len(),
                },
                None => ProductivityPoint {
                    date,
                    total_time: 0.0,
                    mood: 0,
                    tasks_count: 0,
                },
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Task")]
    task: &'a str,
    #[serde(rename = "Time Spent (hours)")]
    time_spent: f64,
    #[serde(rename = "Completed")]
    completed: bool,
    #[serde(rename = "Total Daily Time")]
    total_time: f64,
    #[serde(rename = "Mood")]
    mood: i32,
    #[serde(rename = "Blockers")]
    blockers: &'a str,
}

/// Flatten logs into one CSV row per task, in the order given.
///
/// Returns `None` when there is not a single task to export.
pub fn export_csv(logs: &[DailyLog]) -> AppResult<Option<String>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0usize;

    for log in logs {
        for task in &log.tasks {
            writer
                .serialize(ExportRow {
                    date: log.date,
                    task: &task.description,
                    time_spent: task.time_spent,
                    completed: task.completed,
                    total_time: log.total_time,
                    mood: log.mood,
                    blockers: log.blockers.as_deref().unwrap_or(""),
                })
                .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV write failed: {}", e)))?;
            rows += 1;
        }
    }

    if rows == 0 {
        return Ok(None);
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV flush failed: {}", e)))?;
    let csv = String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV is not UTF-8: {}", e)))?;
    Ok(Some(csv))
}
