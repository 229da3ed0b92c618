use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{AppError, AppResult};
use crate::handlers::parse_id;
use crate::models::notification::Notification;
use crate::models::user::User;
use crate::AppState;

/// Maximum number of notifications returned by a listing.
const MAX_LIMIT: i64 = 100;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .store
        .list_notifications(auth_user.id, MAX_LIMIT)
        .await?;
    Ok(Json(notifications))
}

/// Marks one of the caller's notifications read. Ids that do not belong to
/// the caller are `NotFound` and left untouched.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Path(notification_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let notification_id = parse_id(&notification_id, "Notification")?;
    let found = state
        .store
        .mark_notification_read(notification_id, auth_user.id)
        .await?;

    if !found {
        return Err(AppError::NotFound("Notification not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Notification marked as read" })))
}
