use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::feedback::{CreateFeedbackRequest, Feedback};
use crate::models::user::User;
use crate::services::notify;
use crate::AppState;

/// Managers only, and only on logs written by their direct reports.
///
/// Feedback on a log id that does not exist is still stored, but nobody is
/// notified.
pub async fn add_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Json(body): Json<CreateFeedbackRequest>,
) -> AppResult<Json<Feedback>> {
    auth_user.require_manager("add feedback")?;
    body.validate()?;

    let log = state.store.find_log(body.log_id).await?;

    if let Some(log) = &log {
        let owner = state.store.find_user_by_id(log.user_id).await?;
        if !owner.is_some_and(|o| o.is_report_of(auth_user.id)) {
            return Err(AppError::Forbidden(
                "Log does not belong to one of your direct reports".into(),
            ));
        }
    }

    let feedback = Feedback::new(body.log_id, auth_user.id, body.feedback_text);
    state.store.insert_feedback(&feedback).await?;

    match &log {
        Some(log) => {
            if let Err(e) = notify::feedback_received(state.store.as_ref(), &auth_user, log).await
            {
                tracing::warn!(error = %e, feedback_id = %feedback.id, "Feedback notification not stored");
            }
        }
        None => tracing::debug!(log_id = %feedback.log_id, "Feedback stored for unknown log"),
    }

    tracing::info!(
        manager_id = %auth_user.id,
        log_id = %feedback.log_id,
        feedback_id = %feedback.id,
        "Feedback added"
    );
    Ok(Json(feedback))
}
