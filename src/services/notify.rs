//! Notifications emitted as side effects of other operations.
//!
//! Handlers call these after the primary write has succeeded and only log a
//! failure; the operation itself still succeeds.

use chrono::NaiveDate;

use crate::db::Store;
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::notification::{Notification, NotificationType};
use crate::models::user::User;

pub async fn welcome(store: &dyn Store, user: &User) -> AppResult<()> {
    let notification = Notification::new(
        user.id,
        NotificationType::Info,
        format!(
            "Welcome to DevLog, {}! Start logging your daily work.",
            user.username
        ),
    );
    store.insert_notification(&notification).await
}

/// Tell the author's manager, if there is one, that a log was submitted.
pub async fn log_submitted(store: &dyn Store, author: &User, date: NaiveDate) -> AppResult<()> {
    let Some(manager_id) = author.manager_id else {
        return Ok(());
    };

    let notification = Notification::new(
        manager_id,
        NotificationType::Info,
        format!("{} submitted a daily log for {}", author.username, date),
    );
    store.insert_notification(&notification).await?;
    tracing::debug!(manager_id = %manager_id, author_id = %author.id, "Manager notified of log");
    Ok(())
}

pub async fn feedback_received(store: &dyn Store, manager: &User, log: &DailyLog) -> AppResult<()> {
    let notification = Notification::new(
        log.user_id,
        NotificationType::Feedback,
        format!(
            "New feedback from {} on your {} log",
            manager.username, log.date
        ),
    );
    store.insert_notification(&notification).await
}
