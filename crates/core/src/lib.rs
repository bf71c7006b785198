//! docqa Core Library
//!
//! This crate provides the foundational pieces shared by every docqa crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The `Mode` a question is answered in

pub mod config;
pub mod error;
pub mod logging;
pub mod mode;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use mode::Mode;
