//! Error handling utilities

use crate::error::HarnessError;
use tracing::error;

/// Report a fatal error and exit.
///
/// `HarnessError`s print their user message and exit with their own code.
/// Anything else prints as-is and exits with 1. With `verbose >= 1` the
/// full error chain follows.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let exit_code = if let Some(harness_err) = error.downcast_ref::<HarnessError>() {
        eprintln!("{}", harness_err.user_message());
        harness_err.exit_code()
    } else {
        eprintln!("Error: {error}");
        1
    };

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code)
}
