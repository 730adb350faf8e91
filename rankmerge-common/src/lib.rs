//! # rankmerge Common Library
//!
//! Shared code for the rankmerge workspace:
//! - Configuration loading (TOML file, environment, command line)
//! - Logging initialization
//! - SQLite pool and schema initialization
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
