//! A store that cannot write notifications must not fail the operations that
//! emit them.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{body_json, get_auth, log_body, post_json, post_json_auth};
use serde_json::json;
use uuid::Uuid;

use devlog_api::db::memory::MemoryStore;
use devlog_api::db::{LogFilter, Store};
use devlog_api::error::{AppError, AppResult};
use devlog_api::models::daily_log::DailyLog;
use devlog_api::models::feedback::Feedback;
use devlog_api::models::notification::Notification;
use devlog_api::models::user::{Role, User};

/// Delegates everything to a [`MemoryStore`] except notification inserts,
/// which always fail.
#[derive(Default)]
struct NoNotifications {
    inner: MemoryStore,
}

#[async_trait]
impl Store for NoNotifications {
    fn backend(&self) -> &'static str {
        "memory"
    }
    async fn ping(&self) -> AppResult<()> {
        self.inner.ping().await
    }
    async fn close(&self) {}
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.inner.find_user_by_id(id).await
    }
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.inner.find_user_by_username(username).await
    }
    async fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        self.inner.username_or_email_taken(username, email).await
    }
    async fn insert_user(&self, user: &User) -> AppResult<()> {
        self.inner.insert_user(user).await
    }
    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        self.inner.list_users_by_role(role).await
    }
    async fn list_users_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<User>> {
        self.inner.list_users_by_manager(manager_id).await
    }
    async fn find_log(&self, id: Uuid) -> AppResult<Option<DailyLog>> {
        self.inner.find_log(id).await
    }
    async fn find_owned_log(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<DailyLog>> {
        self.inner.find_owned_log(id, user_id).await
    }
    async fn find_log_by_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyLog>> {
        self.inner.find_log_by_date(user_id, date).await
    }
    async fn insert_log(&self, log: &DailyLog) -> AppResult<()> {
        self.inner.insert_log(log).await
    }
    async fn update_log(&self, log: &DailyLog) -> AppResult<bool> {
        self.inner.update_log(log).await
    }
    async fn list_logs(&self, filter: &LogFilter) -> AppResult<Vec<DailyLog>> {
        self.inner.list_logs(filter).await
    }
    async fn insert_feedback(&self, feedback: &Feedback) -> AppResult<()> {
        self.inner.insert_feedback(feedback).await
    }
    async fn first_feedback_for_log(&self, log_id: Uuid) -> AppResult<Option<Feedback>> {
        self.inner.first_feedback_for_log(log_id).await
    }
    async fn insert_notification(&self, _notification: &Notification) -> AppResult<()> {
        Err(AppError::Internal(anyhow::anyhow!("notifications table unavailable")))
    }
    async fn list_notifications(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        self.inner.list_notifications(user_id, limit).await
    }
    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.inner.mark_notification_read(id, user_id).await
    }
}

#[tokio::test]
async fn writes_succeed_when_notifications_fail() {
    let app = common::build_test_app_with(Arc::new(NoNotifications::default()));

    // Registration emits a welcome notification.
    let manager = common::register(&app, "m1", "pw1", "manager", None).await;
    let developer = common::register(&app, "d1", "pw2", "developer", Some(&manager.id)).await;

    // Log creation notifies the manager.
    let response =
        post_json_auth(&app, "/api/logs", &developer.token, log_body("2024-01-01", 4)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let log_id = body_json(response).await["id"].clone();

    // Feedback notifies the developer.
    let body = json!({ "log_id": log_id, "feedback_text": "good job" });
    let response = post_json_auth(&app, "/api/feedback", &manager.token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(&app, "/api/logs", &developer.token).await).await;
    assert_eq!(json[0]["feedback"], "good job");
    let json = body_json(get_auth(&app, "/api/notifications", &developer.token).await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registration_is_not_repeated_after_lost_notification() {
    let app = common::build_test_app_with(Arc::new(NoNotifications::default()));
    common::register(&app, "solo", "pw", "developer", None).await;

    // The first attempt already stored the account.
    let body = json!({
        "username": "solo",
        "email": "solo@test.com",
        "password": "pw",
        "role": "developer",
    });
    let response = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({ "username": "solo", "password": "pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
