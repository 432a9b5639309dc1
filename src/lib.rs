//! Library root for enable-ecr-login
pub mod error;
pub mod models;

pub mod config;
pub mod identity;
pub mod commands;

// Convenience re-exports
pub use config::Updater;
pub use error::{Error, Result};
pub use models::{Document, LoadOutcome};
