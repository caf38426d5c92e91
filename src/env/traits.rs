use std::path::Path;

/// File system operations trait
///
/// Abstracts file system reads to enable testing with mock implementations.
pub trait FileEnv: Send + Sync {
    /// Read a file's contents as a string
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}
