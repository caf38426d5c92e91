//! Credential loading
//!
//! Secrets live in a [`CredentialStore`] that is filled once at startup and
//! only read afterwards. [`CredentialLoader`] fills a slot from a key file on a
//! best-effort basis: a missing or empty file is reported, never raised.

use crate::env::{FileEnv, RealFileEnv};
use crate::error::{HarnessError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Named secrets, first write wins
#[derive(Clone, Default)]
pub struct CredentialStore {
    values: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `var` from the process environment when it holds a non-empty value
    pub fn from_process_env(var: &str) -> Self {
        let mut store = Self::new();
        if let Ok(value) = std::env::var(var) {
            if store.set_if_absent(var, value) {
                debug!("{} taken from the process environment", var);
            }
        }
        store
    }

    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_if_absent(name, value);
        self
    }

    /// Store `value` under `name` unless a value is already present.
    ///
    /// Empty values are never stored. Returns whether the slot was written.
    pub fn set_if_absent(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.contains(name) {
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Like [`get`](Self::get) but fails with `MissingCredential`
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| HarnessError::MissingCredential {
            var: name.to_string(),
        })
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.values.keys() {
            map.entry(name, &"<redacted>");
        }
        map.finish()
    }
}

/// What a call to [`CredentialLoader::load`] did
#[derive(Debug)]
pub enum LoadOutcome {
    /// The slot already held a value; the file was not opened
    AlreadySet,
    /// The slot was filled from the file
    Loaded,
    /// Soft failure, the slot is still empty
    Skipped(HarnessError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Reads a secret from the first line of a key file
#[derive(Debug, Clone, Default)]
pub struct CredentialLoader<F: FileEnv = RealFileEnv> {
    fs: F,
}

impl CredentialLoader<RealFileEnv> {
    pub fn new() -> Self {
        Self { fs: RealFileEnv }
    }
}

impl<F: FileEnv> CredentialLoader<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Fill `var` in `store` from `file_path` unless it is already set.
    ///
    /// Diagnostics go to stdout as well as the log.
    pub fn load(&self, store: &mut CredentialStore, var: &str, file_path: &Path) -> LoadOutcome {
        if store.contains(var) {
            debug!("{} already set, not reading {}", var, file_path.display());
            return LoadOutcome::AlreadySet;
        }

        match self.read_secret(file_path) {
            Ok(secret) => {
                store.set_if_absent(var, secret);
                info!("Loaded {} from {}", var, file_path.display());
                println!("Successfully loaded {var} from {}", file_path.display());
                LoadOutcome::Loaded
            }
            Err(err) => {
                debug_assert!(err.is_soft(), "hard error from key file read: {err}");
                warn!("Credential {} not loaded: {}", var, err);
                match &err {
                    HarnessError::EmptyCredential { path } => {
                        println!("Warning: {} is empty.", path.display())
                    }
                    other => println!("Error: {other}"),
                }
                LoadOutcome::Skipped(err)
            }
        }
    }

    fn read_secret(&self, path: &Path) -> Result<String> {
        let content = self.fs.read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                HarnessError::CredentialFileMissing {
                    path: path.to_path_buf(),
                }
            } else {
                HarnessError::CredentialRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let secret = content.lines().next().unwrap_or_default().trim();
        if secret.is_empty() {
            return Err(HarnessError::EmptyCredential {
                path: path.to_path_buf(),
            });
        }
        Ok(secret.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockFileEnv;

    const VAR: &str = "OPENAI_API_KEY";

    fn loader_with(path: &str, content: &str) -> CredentialLoader<MockFileEnv> {
        let fs = MockFileEnv::new();
        fs.add_file(path, content);
        CredentialLoader::with_fs(fs)
    }

    #[test]
    fn test_loads_trimmed_first_line() {
        let loader = loader_with("keys/openai.txt", "  sk-abc123  \nsecond line\n");
        let mut store = CredentialStore::new();

        let outcome = loader.load(&mut store, VAR, Path::new("keys/openai.txt"));

        assert!(outcome.is_loaded());
        assert_eq!(store.get(VAR), Some("sk-abc123"));
    }

    #[test]
    fn test_preset_value_is_never_overwritten() {
        let loader = loader_with("keys/openai.txt", "from-file");
        let mut store = CredentialStore::new().with_value(VAR, "from-env");

        let first = loader.load(&mut store, VAR, Path::new("keys/openai.txt"));
        let second = loader.load(&mut store, VAR, Path::new("keys/openai.txt"));

        assert!(matches!(first, LoadOutcome::AlreadySet));
        assert!(matches!(second, LoadOutcome::AlreadySet));
        assert_eq!(store.get(VAR), Some("from-env"));
    }

    #[test]
    fn test_second_load_keeps_first_value() {
        let fs = MockFileEnv::new();
        fs.add_file("a.txt", "first");
        fs.add_file("b.txt", "second");
        let loader = CredentialLoader::with_fs(fs);
        let mut store = CredentialStore::new();

        assert!(loader.load(&mut store, VAR, Path::new("a.txt")).is_loaded());
        assert!(!loader.load(&mut store, VAR, Path::new("b.txt")).is_loaded());
        assert_eq!(store.get(VAR), Some("first"));
    }

    #[test]
    fn test_missing_file_is_soft() {
        let loader = CredentialLoader::with_fs(MockFileEnv::new());
        let mut store = CredentialStore::new();

        let outcome = loader.load(&mut store, VAR, Path::new("nope.txt"));

        match outcome {
            LoadOutcome::Skipped(err) => {
                assert!(matches!(err, HarnessError::CredentialFileMissing { .. }));
                assert!(err.is_soft());
            }
            other => panic!("expected Skipped, got {other:?}"),
        }
        assert!(store.get(VAR).is_none());
    }

    #[test]
    fn test_unreadable_key_file_is_soft() {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = CredentialLoader::new();
        let mut store = CredentialStore::new();

        // A directory exists but cannot be read as a file
        let outcome = loader.load(&mut store, VAR, dir.path());

        match outcome {
            LoadOutcome::Skipped(err) => {
                assert!(matches!(err, HarnessError::CredentialRead { .. }), "{err:?}");
                assert!(err.is_soft());
            }
            other => panic!("expected Skipped, got {other:?}"),
        }
        assert!(!store.contains(VAR));
    }

    #[test]
    fn test_blank_first_line_is_empty_credential() {
        let loader = loader_with("keys/openai.txt", "   \nsk-on-second-line\n");
        let mut store = CredentialStore::new();

        let outcome = loader.load(&mut store, VAR, Path::new("keys/openai.txt"));

        assert!(matches!(
            outcome,
            LoadOutcome::Skipped(HarnessError::EmptyCredential { .. })
        ));
        assert!(!store.contains(VAR));
    }

    #[test]
    fn test_require_reports_missing_credential() {
        let store = CredentialStore::new();
        let err = store.require(VAR).unwrap_err();
        assert!(matches!(err, HarnessError::MissingCredential { ref var } if var == VAR));
    }

    #[test]
    fn test_empty_value_is_not_stored() {
        let mut store = CredentialStore::new();
        assert!(!store.set_if_absent(VAR, ""));
        assert!(store.set_if_absent(VAR, "x"));
        assert!(!store.set_if_absent(VAR, "y"));
        assert_eq!(store.get(VAR), Some("x"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let store = CredentialStore::new().with_value(VAR, "sk-very-secret");
        let rendered = format!("{store:?}");
        assert!(rendered.contains(VAR));
        assert!(!rendered.contains("sk-very-secret"));
    }
}
