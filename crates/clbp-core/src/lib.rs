//! clbp-core
//!
//! Pure domain types, validation rules, and document store key conventions.
//! Shared vocabulary of the CLBP system, with no storage or HTTP dependency.

pub mod error;
pub mod keys;
pub mod models;
