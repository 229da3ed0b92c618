use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{LogFilter, SortOrder};
use crate::error::{AppError, AppResult};
use crate::models::user::User;
use crate::services::analytics::{export_csv, productivity_series, ProductivityPoint};
use crate::AppState;

const DEFAULT_DAYS: i64 = 30;
const MAX_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct ProductivityQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub csv_data: String,
}

/// Trailing window of `days` days ending yesterday, one point per day.
pub async fn get_productivity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Query(query): Query<ProductivityQuery>,
) -> AppResult<Json<Vec<ProductivityPoint>>> {
    let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let today = Utc::now().date_naive();
    let start = today - Duration::days(days);

    let filter = LogFilter::for_users(vec![auth_user.id])
        .between(Some(start), Some(today))
        .order(SortOrder::Ascending);
    let logs = state.store.list_logs(&filter).await?;

    Ok(Json(productivity_series(&logs, start, days)))
}

pub async fn export_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<User>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Json<ExportResponse>> {
    let filter = LogFilter::for_users(vec![auth_user.id])
        .between(Some(query.start_date), Some(query.end_date))
        .order(SortOrder::Ascending);
    let logs = state.store.list_logs(&filter).await?;

    let csv_data = export_csv(&logs)?.ok_or_else(|| {
        AppError::NotFound("No data found for the specified date range".into())
    })?;

    Ok(Json(ExportResponse { csv_data }))
}
