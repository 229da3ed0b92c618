pub mod analytics;
pub mod auth;
pub mod daily_logs;
pub mod feedback;
pub mod health;
pub mod notifications;
pub mod team;
pub mod users;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parses a path id. A malformed id names nothing, so it is `NotFound`
/// rather than a plain-text extractor rejection.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} not found")))
}
