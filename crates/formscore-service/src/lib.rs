//! FormScore service.
//!
//! This crate provides:
//! - `FormScoreService`, the async entry point for scoring and reference capture
//! - Configuration from environment variables
//! - Structured per-request logging
//! - The `formscore` command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use cli::{Cli, Commands};
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use logging::ScoringLogger;
pub use service::FormScoreService;
