//! Manager views over their direct reports.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::db::LogFilter;
use crate::error::{AppError, AppResult};
use crate::handlers::daily_logs::feedback_text;
use crate::models::daily_log::{DailyLogResponse, TeamLogQuery};
use crate::models::user::{User, UserResponse};
use crate::AppState;

const UNKNOWN_USER: &str = "Unknown";

pub async fn list_team_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Query(query): Query<TeamLogQuery>,
) -> AppResult<Json<Vec<DailyLogResponse>>> {
    auth_user.require_manager("view team logs")?;

    let reports = state.store.list_users_by_manager(auth_user.id).await?;
    let report_ids: Vec<Uuid> = reports.iter().map(|u| u.id).collect();

    // A developer_id narrows the scope to that one report.
    let scope = match query.developer_id {
        Some(developer_id) if report_ids.contains(&developer_id) => vec![developer_id],
        Some(developer_id) => {
            tracing::warn!(
                manager_id = %auth_user.id,
                developer_id = %developer_id,
                "Team log query for a developer outside the manager's team"
            );
            return Err(AppError::Forbidden(
                "Developer is not one of your direct reports".into(),
            ));
        }
        None => report_ids,
    };

    let filter = LogFilter::for_users(scope).between(query.start_date, query.end_date);
    let logs = state.store.list_logs(&filter).await?;

    let mut names: HashMap<Uuid, String> =
        reports.into_iter().map(|u| (u.id, u.username)).collect();

    let mut result = Vec::with_capacity(logs.len());
    for log in logs {
        let user_name = match names.get(&log.user_id) {
            Some(name) => name.clone(),
            None => {
                let name = state
                    .store
                    .find_user_by_id(log.user_id)
                    .await?
                    .map(|u| u.username)
                    .unwrap_or_else(|| UNKNOWN_USER.to_string());
                names.insert(log.user_id, name.clone());
                name
            }
        };
        let feedback = feedback_text(state.store.as_ref(), log.id).await?;
        result.push(DailyLogResponse {
            log,
            user_name,
            feedback,
        });
    }

    Ok(Json(result))
}

pub async fn list_team_developers(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
) -> AppResult<Json<Vec<UserResponse>>> {
    auth_user.require_manager("view team developers")?;

    let developers = state.store.list_users_by_manager(auth_user.id).await?;
    Ok(Json(developers.into_iter().map(Into::into).collect()))
}
