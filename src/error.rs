use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Key file not found at {}. Please create the file.", path.display())]
    CredentialFileMissing { path: PathBuf },

    #[error("Key file {} is empty", path.display())]
    EmptyCredential { path: PathBuf },

    #[error("Failed to read key file {}: {source}", path.display())]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential {var} is not set (no key file and no environment value)")]
    MissingCredential { var: String },

    #[error("Fixture schema or insert failed: {0}")]
    SchemaOrInsertFailure(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    /// Soft failures are reported and swallowed during credential loading.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::CredentialFileMissing { .. }
                | Self::EmptyCredential { .. }
                | Self::CredentialRead { .. }
        )
    }

    /// Process exit code for a failure that reaches the entry point
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredential { .. } | Self::Config(_) => 2,
            _ => 1,
        }
    }

    /// Message shown to the user on stderr
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential { var } => format!(
                "Error: {var} is not set. Put the key in the key file or export {var}."
            ),
            Self::Transport(msg) => format!("Error: request to completion service failed: {msg}"),
            Self::MalformedResponse(msg) => {
                format!("Error: completion service returned an unexpected payload: {msg}")
            }
            other => format!("Error: {other}"),
        }
    }
}
