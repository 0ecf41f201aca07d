//! Authentication primitives.
//!
//! Tokens are issued by the identity service that owns user credentials;
//! this server only verifies them.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation, for issuers
//!   sharing the secret and for tests).

pub mod jwt;
