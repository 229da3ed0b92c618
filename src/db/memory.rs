use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{conflict, LogFilter, SortOrder, Store, DUPLICATE_LOG, DUPLICATE_USER};
use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::feedback::Feedback;
use crate::models::notification::Notification;
use crate::models::user::{Role, User};

/// Process-local store. Each check-then-write runs under one write lock, so
/// uniqueness holds under concurrent requests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    logs: Vec<DailyLog>,
    feedback: Vec<Feedback>,
    notifications: Vec<Notification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(conflict(DUPLICATE_USER));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().filter(|u| u.role == role).cloned().collect())
    }

    async fn list_users_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.is_report_of(manager_id))
            .cloned()
            .collect())
    }

    async fn find_log(&self, id: Uuid) -> AppResult<Option<DailyLog>> {
        let tables = self.tables.read().await;
        Ok(tables.logs.iter().find(|l| l.id == id).cloned())
    }

    async fn find_owned_log(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<DailyLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .logs
            .iter()
            .find(|l| l.id == id && l.user_id == user_id)
            .cloned())
    }

    async fn find_log_by_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .logs
            .iter()
            .find(|l| l.user_id == user_id && l.date == date)
            .cloned())
    }

    async fn insert_log(&self, log: &DailyLog) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .logs
            .iter()
            .any(|l| l.user_id == log.user_id && l.date == log.date)
        {
            return Err(conflict(DUPLICATE_LOG));
        }
        tables.logs.push(log.clone());
        Ok(())
    }

    async fn update_log(&self, log: &DailyLog) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .logs
            .iter()
            .any(|l| l.id != log.id && l.user_id == log.user_id && l.date == log.date)
        {
            return Err(conflict(DUPLICATE_LOG));
        }
        match tables
            .logs
            .iter_mut()
            .find(|l| l.id == log.id && l.user_id == log.user_id)
        {
            Some(existing) => {
                existing.date = log.date;
                existing.tasks = log.tasks.clone();
                existing.total_time = log.total_time;
                existing.mood = log.mood;
                existing.blockers = log.blockers.clone();
                existing.updated_at = log.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_logs(&self, filter: &LogFilter) -> AppResult<Vec<DailyLog>> {
        let tables = self.tables.read().await;
        let mut logs: Vec<DailyLog> = tables
            .logs
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        match filter.order {
            SortOrder::Ascending => logs.sort_by_key(|l| l.date),
            SortOrder::Descending => logs.sort_by(|a, b| b.date.cmp(&a.date)),
        }
        Ok(logs)
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.feedback.push(feedback.clone());
        Ok(())
    }

    async fn first_feedback_for_log(&self, log_id: Uuid) -> AppResult<Option<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables
            .feedback
            .iter()
            .filter(|f| f.log_id == log_id)
            .min_by_key(|f| f.created_at)
            .cloned())
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut notifications: Vec<Notification> = tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
