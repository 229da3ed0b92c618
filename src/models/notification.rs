use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    /// Only ever moves from `false` to `true`.
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Reminder,
    Feedback,
    Info,
}

impl Notification {
    pub fn new(user_id: Uuid, kind: NotificationType, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}
