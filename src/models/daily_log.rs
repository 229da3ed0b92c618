use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::empty_string_as_none;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub total_time: f64,
    pub mood: i32,
    pub blockers: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A unit of work inside a daily log. Has no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Task {
    #[validate(length(min = 1, max = 500, message = "Task description must be 1-500 characters"))]
    pub description: String,

    /// Hours.
    #[validate(range(min = 0.0, max = 24.0, message = "time_spent must be between 0 and 24 hours"))]
    pub time_spent: f64,

    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// Body for both `POST /logs` and `PUT /logs/:id`. An update replaces every field.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DailyLogRequest {
    pub date: NaiveDate,

    #[validate]
    pub tasks: Vec<Task>,

    /// Caller-supplied; not reconciled with the task hours.
    #[validate(range(min = 0.0, message = "total_time must not be negative"))]
    pub total_time: f64,

    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: i32,

    pub blockers: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyLogQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamLogQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub developer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    #[serde(flatten)]
    pub log: DailyLog,
    pub user_name: String,
    pub feedback: Option<String>,
}

impl DailyLog {
    pub fn new(user_id: Uuid, req: DailyLogRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            date: req.date,
            tasks: req.tasks,
            total_time: req.total_time,
            mood: req.mood,
            blockers: req.blockers,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field and bump `updated_at`.
    pub fn apply(&mut self, req: DailyLogRequest) {
        self.date = req.date;
        self.tasks = req.tasks;
        self.total_time = req.total_time;
        self.mood = req.mood;
        self.blockers = req.blockers;
        self.updated_at = Utc::now();
    }
}
