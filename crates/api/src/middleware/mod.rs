//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`json::JsonBody`] -- JSON body with enveloped rejections.

pub mod auth;
pub mod json;
