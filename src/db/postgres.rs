use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{conflict, LogFilter, SortOrder, Store, DUPLICATE_LOG, DUPLICATE_USER};
use crate::error::{AppError, AppResult};
use crate::models::daily_log::{DailyLog, Task};
use crate::models::feedback::Feedback;
use crate::models::notification::Notification;
use crate::models::user::{Role, User};

pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DailyLogRow {
    id: Uuid,
    user_id: Uuid,
    log_date: NaiveDate,
    tasks: Json<Vec<Task>>,
    total_time: f64,
    mood: i32,
    blockers: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DailyLogRow> for DailyLog {
    fn from(row: DailyLogRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.log_date,
            tasks: row.tasks.0,
            total_time: row.total_time,
            mood: row.mood,
            blockers: row.blockers,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Turn a unique-index violation into `Conflict`, pass everything else through.
fn unique_violation_as(message: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict(message),
        _ => AppError::Database(e),
    }
}

impl PgStore {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool. The schema is assumed to be migrated.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to run migrations: {}", e)))
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, role, password_hash, manager_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.password_hash)
        .bind(user.manager_id)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(DUPLICATE_USER))?;
        Ok(())
    }

    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY username ASC",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_users_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE manager_id = $1 ORDER BY username ASC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_log(&self, id: Uuid) -> AppResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>("SELECT * FROM daily_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_owned_log(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            "SELECT * FROM daily_logs WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_log_by_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn insert_log(&self, log: &DailyLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_logs
                (id, user_id, log_date, tasks, total_time, mood, blockers, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.date)
        .bind(Json(&log.tasks))
        .bind(log.total_time)
        .bind(log.mood)
        .bind(&log.blockers)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(DUPLICATE_LOG))?;
        Ok(())
    }

    async fn update_log(&self, log: &DailyLog) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE daily_logs SET
                log_date = $3,
                tasks = $4,
                total_time = $5,
                mood = $6,
                blockers = $7,
                updated_at = $8
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.date)
        .bind(Json(&log.tasks))
        .bind(log.total_time)
        .bind(log.mood)
        .bind(&log.blockers)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(DUPLICATE_LOG))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_logs(&self, filter: &LogFilter) -> AppResult<Vec<DailyLog>> {
        let direction = match filter.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let sql = format!(
            r#"
            SELECT * FROM daily_logs
            WHERE user_id = ANY($1)
              AND ($2::date IS NULL OR log_date >= $2)
              AND ($3::date IS NULL OR log_date <= $3)
            ORDER BY log_date {direction}
            "#
        );

        let rows = sqlx::query_as::<_, DailyLogRow>(&sql)
            .bind(&filter.user_ids)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO feedback (id, log_id, manager_id, feedback_text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.log_id)
        .bind(feedback.manager_id)
        .bind(&feedback.feedback_text)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn first_feedback_for_log(&self, log_id: Uuid) -> AppResult<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT * FROM feedback
            WHERE log_id = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(log_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(feedback)
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, message, type, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
