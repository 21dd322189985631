//! clbp-server
//!
//! HTTP API for questionnaire design, patient assessments, notes, settings,
//! and the first-run installer. Served standalone or behind AWS Lambda.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
