//! LearnPilot Common Library
//!
//! Shared code for the LearnPilot curriculum engine including:
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability
//! - Shared domain types

pub mod config;
pub mod errors;
pub mod metrics;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use types::Difficulty;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
