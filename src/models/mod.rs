//! Data models, configuration, and error types

pub mod config;
pub mod errors;
pub mod types;
