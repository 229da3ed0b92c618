use axum::{extract::State, Extension, Json};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::issue_access_token,
    password::{hash_password, verify_against_dummy, verify_password},
};
use crate::db::DUPLICATE_USER;
use crate::error::{AppError, AppResult};
use crate::models::user::{
    AuthResponse, LoginRequest, RegisterRequest, Role, User, UserResponse,
};
use crate::services::notify;
use crate::AppState;

const BAD_CREDENTIALS: &str = "Incorrect username or password";

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = issue_access_token(user.id, &state.config)?;
    Ok(AuthResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt_ttl_secs,
        user: user.into(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    if state
        .store
        .username_or_email_taken(&body.username, &body.email)
        .await?
    {
        return Err(AppError::Conflict(DUPLICATE_USER.into()));
    }

    if let Some(manager_id) = body.manager_id {
        let manager = state.store.find_user_by_id(manager_id).await?;
        if !matches!(manager, Some(User { role: Role::Manager, .. })) {
            return Err(AppError::Validation(
                "manager_id must reference a manager".into(),
            ));
        }
    }

    let user = User {
        id: Uuid::new_v4(),
        username: body.username,
        email: body.email,
        role: body.role,
        password_hash: hash_password(&body.password)?,
        manager_id: body.manager_id,
        created_at: Utc::now(),
    };

    state.store.insert_user(&user).await?;
    // The account exists from here on; a lost notification must not fail it.
    if let Err(e) = notify::welcome(state.store.as_ref(), &user).await {
        tracing::warn!(error = %e, user_id = %user.id, "Welcome notification not stored");
    }

    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    Ok(Json(auth_response(&state, user)?))
}

/// Unknown usernames and wrong passwords fail identically.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(user) = state.store.find_user_by_username(&body.username).await? else {
        verify_against_dummy(&body.password);
        tracing::debug!("Login rejected: unknown username");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    };

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    }

    Ok(Json(auth_response(&state, user)?))
}

pub async fn me(Extension(auth_user): Extension<User>) -> Json<UserResponse> {
    Json(auth_user.into())
}
