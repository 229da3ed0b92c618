use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::empty_string_as_none;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Manager,
}

impl User {
    /// Fails with `Forbidden` unless this user holds the manager role.
    ///
    /// `action` completes the sentence "Only managers can ...".
    pub fn require_manager(&self, action: &str) -> AppResult<()> {
        match self.role {
            Role::Manager => Ok(()),
            Role::Developer => Err(AppError::Forbidden(format!(
                "Only managers can {action}"
            ))),
        }
    }

    pub fn is_report_of(&self, manager_id: Uuid) -> bool {
        self.manager_id == Some(manager_id)
    }
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            manager_id: u.manager_id,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,

    pub role: Role,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserResponse,
}
