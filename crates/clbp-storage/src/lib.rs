//! clbp-storage
//!
//! Document storage. JSON documents live in an S3 bucket in production and
//! in an in-process map for development and tests.

pub mod client;
pub mod documents;
pub mod error;
pub mod memory;
pub mod objects;
pub mod settings;
pub mod store;
