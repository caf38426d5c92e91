//! # fixture-harness
//!
//! A single-shot harness: load an API key from a local file, seed an
//! in-memory SQLite database with synthetic employees, send one request to a
//! text-completion endpoint and print the answer.
//!
//! ## Usage
//!
//! ```bash
//! fixture-harness [-v] [--config harness.toml] [--key-file path] [--seed N]
//! ```
//!
//! ## Modules
//!
//! - `app` - Configuration, logging setup and fatal error reporting
//! - `completion` - Completion API request and response handling
//! - `credentials` - Credential store and best-effort key file loading
//! - `database` - Ephemeral SQLite connection
//! - `env` - File system abstraction for testing
//! - `error` - Error taxonomy shared by every module
//! - `fixture` - Reproducible employee fixture and its scoped table population
//! - `workflow` - The end-to-end run and its resource scope
pub mod app;
pub mod completion;
pub mod credentials;
pub mod database;
pub mod env;
pub mod error;
pub mod fixture;
pub mod workflow;

pub use error::{HarnessError, Result};
