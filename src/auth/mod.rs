//! Authentication and authorization.
//!
//! - [`password`] -- Argon2id hashing and verification.
//! - [`jwt`] -- bearer token issue/verify.
//! - [`middleware`] -- the guard that resolves a bearer token to a [`crate::models::user::User`].

pub mod jwt;
pub mod middleware;
pub mod password;
