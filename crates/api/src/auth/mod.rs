//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and issuance, for tooling and tests).

pub mod jwt;
