use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::user::{Role, UserResponse};
use crate::AppState;

/// Public: feeds the manager picker on the registration form.
pub async fn list_managers(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let managers = state.store.list_users_by_role(Role::Manager).await?;
    Ok(Json(managers.into_iter().map(Into::into).collect()))
}
