use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

pub mod daily_log;
pub mod feedback;
pub mod notification;
pub mod user;

/// Treats a missing, `null` or blank value as `None`. The frontend sends
/// unset form fields and filters as `""`.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
