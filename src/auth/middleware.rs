use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

/// Resolves the bearer token to a stored user and inserts that
/// [`User`](crate::models::user::User) as a request extension.
///
/// A missing `Authorization` header is `Unauthenticated`; anything else that
/// goes wrong (wrong scheme, bad token, deleted user) is `InvalidToken`.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if rejection.is_missing() {
            AppError::Unauthenticated("Not authenticated".into())
        } else {
            AppError::InvalidToken
        }
    })?;

    let user_id = verify_token(bearer.token(), &state.config.jwt_secret)?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token subject no longer exists");
            AppError::InvalidToken
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
