//! clbp-export
//!
//! Tabular exports of assessment data for analysis outside the application.

pub mod csv;
pub mod error;
