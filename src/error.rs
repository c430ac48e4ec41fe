/// Crate-level error types for pathlink diagnostics.
use std::path::PathBuf;

use crate::types::RootRule;

/// All errors in pathlink carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, token, or reason for failure.
#[allow(clippy::error_impl_error, reason = "single crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file exists but holds a value pathlink cannot use.
    #[error("invalid config in {}: {reason}", path.display())]
    ConfigInvalid {
        /// Path to the offending config file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A pattern set was built with no patterns at all.
    #[error("pattern set is empty")]
    EmptyPatternList,

    /// A document named on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A token pattern failed to compile or names a capture group it does not have.
    #[error("invalid token pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Source text of the pattern.
        pattern: String,
        /// Description of the failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The cursor does not rest on any recognized path token.
    #[error("no file path found at line {line}, column {column}")]
    NoTokenAtCursor {
        /// Zero-based column that was queried, counted the way the caller counts it
        /// (byte offset in the core, character column from the CLI).
        column: usize,
        /// Zero-based line index that was queried.
        line: usize,
    },

    /// The resolved target exists but could not be opened.
    #[error("error opening file {}: {source}", path.display())]
    OpenFailure {
        /// Path that failed to open.
        path: PathBuf,
        /// The wrapped I/O error, passed through verbatim.
        source: std::io::Error,
    },

    /// A token resolved to a path that does not exist on disk.
    #[error("file not found: {} ({rule})", path.display())]
    PathNotFound {
        /// Absolute path that was attempted.
        path: PathBuf,
        /// Root rule that produced the attempted path.
        rule: RootRule,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The config file could not be parsed for in-place editing.
    #[error("toml edit: {0}")]
    TomlEdit(
        /// The wrapped format-preserving parse error.
        #[from]
        toml_edit::TomlError,
    ),
}

impl Error {
    /// True for the "nothing there" conditions a host reports as information
    /// rather than failure.
    pub const fn is_not_found(&self) -> bool {
        return matches!(self, Self::NoTokenAtCursor { .. } | Self::PathNotFound { .. });
    }
}
