//! Environment abstraction for the file reads the harness performs
//!
//! The credential loader reads its key file through [`FileEnv`] so tests can
//! run against an in-memory file system instead of touching disk.
//!
//! ```
//! use fixture_harness::env::{FileEnv, MockFileEnv};
//! use std::path::Path;
//!
//! let fs = MockFileEnv::new();
//! fs.add_file("keys/openai.txt", "sk-test\n");
//!
//! let content = fs.read_to_string(Path::new("keys/openai.txt")).unwrap();
//! assert_eq!(content, "sk-test\n");
//! ```

mod mock;
mod real;
mod traits;

pub use mock::MockFileEnv;
pub use real::RealFileEnv;
pub use traits::FileEnv;
