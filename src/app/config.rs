//! Application configuration
//!
//! [`AppConfig`] is assembled once at startup from defaults, an optional TOML
//! file and command-line overrides, then passed around by reference.

use crate::completion::CompletionRequest;
use crate::error::{HarnessError, Result};
use crate::fixture::DEFAULT_ROSTER;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CREDENTIAL_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_CREDENTIAL_FILE: &str = "../keys/openai.txt";
pub const DEFAULT_ROOT_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_INPUT: &str = "What is 1+1";
pub const DEFAULT_INSTRUCTIONS: &str = "Answer in specified question by writing SQL";

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Name of the credential slot the completion call reads
    pub credential_var: String,
    /// Key file holding the credential on its first line
    pub credential_file: PathBuf,
    /// Completion API root, `/responses` is appended
    pub root_url: String,
    pub model: String,
    pub input: String,
    pub instructions: String,
    /// Names to generate fixture employees for
    pub roster: Vec<String>,
    /// Fixed seed for the fixture generator, OS entropy when unset
    pub seed: Option<u64>,
    /// Overall HTTP timeout, none when unset
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Overlay every field the file sets
    pub fn with_file_config(mut self, file: FileConfig) -> Self {
        if let Some(var) = file.credential_var {
            self.credential_var = var;
        }
        if let Some(path) = file.credential_file {
            self.credential_file = path;
        }
        if let Some(url) = file.root_url {
            self.root_url = url;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(input) = file.input {
            self.input = input;
        }
        if let Some(instructions) = file.instructions {
            self.instructions = instructions;
        }
        if let Some(roster) = file.roster {
            self.roster = roster;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
        if file.request_timeout.is_some() {
            self.request_timeout = file.request_timeout;
        }
        self
    }

    pub fn with_credential_file(mut self, path: PathBuf) -> Self {
        self.credential_file = path;
        self
    }

    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.root_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,sqlx=debug",
        }
    }

    pub fn completion_request(&self) -> CompletionRequest {
        CompletionRequest::new(&self.model, &self.input, &self.instructions)
    }

    /// Random source for the fixture: seeded when `seed` is set
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            credential_var: DEFAULT_CREDENTIAL_VAR.to_string(),
            credential_file: PathBuf::from(DEFAULT_CREDENTIAL_FILE),
            root_url: DEFAULT_ROOT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            input: DEFAULT_INPUT.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            roster: DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect(),
            seed: None,
            request_timeout: None,
        }
    }
}

/// Optional settings read from a TOML file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub credential_var: Option<String>,
    pub credential_file: Option<PathBuf>,
    pub root_url: Option<String>,
    pub model: Option<String>,
    pub input: Option<String>,
    pub instructions: Option<String>,
    pub roster: Option<Vec<String>>,
    pub seed: Option<u64>,
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
