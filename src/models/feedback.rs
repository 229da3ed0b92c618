use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub log_id: Uuid,
    pub manager_id: Uuid,
    pub feedback_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub log_id: Uuid,

    #[validate(length(min = 1, max = 5000, message = "Feedback must be 1-5000 characters"))]
    pub feedback_text: String,
}

impl Feedback {
    pub fn new(log_id: Uuid, manager_id: Uuid, feedback_text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            log_id,
            manager_id,
            feedback_text,
            created_at: Utc::now(),
        }
    }
}
