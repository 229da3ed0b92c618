use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::db::{LogFilter, Store, DUPLICATE_LOG};
use crate::error::{AppError, AppResult};
use crate::handlers::parse_id;
use crate::models::daily_log::{DailyLog, DailyLogQuery, DailyLogRequest, DailyLogResponse};
use crate::models::user::User;
use crate::services::notify;
use crate::AppState;

pub async fn create_daily_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Json(body): Json<DailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    body.validate()?;

    if state
        .store
        .find_log_by_date(auth_user.id, body.date)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_LOG.into()));
    }

    let log = DailyLog::new(auth_user.id, body);
    state.store.insert_log(&log).await?;

    if let Err(e) = notify::log_submitted(state.store.as_ref(), &auth_user, log.date).await {
        tracing::warn!(error = %e, log_id = %log.id, "Manager notification not stored");
    }

    tracing::info!(user_id = %auth_user.id, log_id = %log.id, date = %log.date, "Daily log created");
    Ok(Json(log))
}

pub async fn list_daily_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<Vec<DailyLogResponse>>> {
    let filter =
        LogFilter::for_users(vec![auth_user.id]).between(query.start_date, query.end_date);
    let logs = state.store.list_logs(&filter).await?;

    let mut result = Vec::with_capacity(logs.len());
    for log in logs {
        let feedback = feedback_text(state.store.as_ref(), log.id).await?;
        result.push(DailyLogResponse {
            log,
            user_name: auth_user.username.clone(),
            feedback,
        });
    }

    Ok(Json(result))
}

/// Owner-only. A log that exists but belongs to someone else is reported as
/// not found, same as a missing id.
pub async fn update_daily_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Path(log_id): Path<String>,
    Json(body): Json<DailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    let log_id = parse_id(&log_id, "Log")?;
    body.validate()?;

    let mut log = state
        .store
        .find_owned_log(log_id, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Log not found".into()))?;

    if log.date != body.date
        && state
            .store
            .find_log_by_date(auth_user.id, body.date)
            .await?
            .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_LOG.into()));
    }

    log.apply(body);
    if !state.store.update_log(&log).await? {
        return Err(AppError::NotFound("Log not found".into()));
    }

    tracing::info!(user_id = %auth_user.id, log_id = %log.id, "Daily log updated");
    Ok(Json(log))
}

/// Text of the earliest feedback on a log.
pub(crate) async fn feedback_text(store: &dyn Store, log_id: Uuid) -> AppResult<Option<String>> {
    Ok(store
        .first_feedback_for_log(log_id)
        .await?
        .map(|f| f.feedback_text))
}
