//! clbp-auth
//!
//! Staff authentication: Argon2 password hashes and signed session tokens.

pub mod error;
pub mod password;
pub mod secret;
pub mod token;
