//! Application module
//!
//! This module contains application-level functionality including:
//! - Configuration handling
//! - Logging setup
//! - Fatal error reporting

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::{AppConfig, FileConfig};
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
