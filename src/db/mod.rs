//! Persistence.
//!
//! Handlers talk to a [`Store`]; [`postgres::PgStore`] backs production and
//! [`memory::MemoryStore`] backs tests and `DATABASE_URL=memory://`.
//!
//! Uniqueness of usernames, emails and `(user_id, date)` logs is enforced by
//! the store itself: violations come back as [`AppError::Conflict`] even when
//! two requests race past the handlers' existence checks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::daily_log::DailyLog;
use crate::models::feedback::Feedback;
use crate::models::notification::Notification;
use crate::models::user::{Role, User};

pub mod memory;
pub mod postgres;

pub const DUPLICATE_USER: &str = "Username or email already registered";
pub const DUPLICATE_LOG: &str = "Log already exists for this date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Selects daily logs by owner and inclusive date range, ordered by date.
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub user_ids: Vec<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order: SortOrder,
}

impl LogFilter {
    pub fn for_users(user_ids: Vec<Uuid>) -> Self {
        Self {
            user_ids,
            start_date: None,
            end_date: None,
            order: SortOrder::Descending,
        }
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches(&self, log: &DailyLog) -> bool {
        self.user_ids.contains(&log.user_id)
            && self.start_date.map_or(true, |start| log.date >= start)
            && self.end_date.map_or(true, |end| log.date <= end)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by `/readyz`.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;

    /// Release the underlying connections. Called once at shutdown.
    async fn close(&self);

    // Users
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool>;
    async fn insert_user(&self, user: &User) -> AppResult<()>;
    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>>;
    async fn list_users_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<User>>;

    // Daily logs
    async fn find_log(&self, id: Uuid) -> AppResult<Option<DailyLog>>;
    async fn find_owned_log(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<DailyLog>>;
    async fn find_log_by_date(&self, user_id: Uuid, date: NaiveDate)
        -> AppResult<Option<DailyLog>>;
    async fn insert_log(&self, log: &DailyLog) -> AppResult<()>;
    /// Writes every mutable field, matching on both `id` and `user_id`.
    /// Returns `false` when nothing matched.
    async fn update_log(&self, log: &DailyLog) -> AppResult<bool>;
    async fn list_logs(&self, filter: &LogFilter) -> AppResult<Vec<DailyLog>>;

    // Feedback
    async fn insert_feedback(&self, feedback: &Feedback) -> AppResult<()>;
    /// The earliest feedback left on a log, if any.
    async fn first_feedback_for_log(&self, log_id: Uuid) -> AppResult<Option<Feedback>>;

    // Notifications
    async fn insert_notification(&self, notification: &Notification) -> AppResult<()>;
    /// Newest first.
    async fn list_notifications(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>>;
    /// Returns `false` when no notification with this id belongs to `user_id`.
    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

/// Open the store named by `DATABASE_URL` and bring its schema up to date.
pub async fn connect(config: &Config) -> AppResult<Arc<dyn Store>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(memory::MemoryStore::new()));
    }

    let store = postgres::PgStore::connect(&config.database_url).await?;
    store.migrate().await?;
    tracing::info!("Database migrations applied");
    Ok(Arc::new(store))
}

pub(crate) fn conflict(message: &str) -> AppError {
    AppError::Conflict(message.to_string())
}
