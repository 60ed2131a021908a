//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the acting user from a JWT Bearer token.

pub mod auth;
