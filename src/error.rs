/// Crate-level error types for link resolution and the CLI around it.
use std::path::PathBuf;

/// Errors carry the path or capability involved so a message is useful on its own.
///
/// A link that matches nothing is not an error: resolution reports it as `None`
/// or an empty list.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file named on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A file lies outside the project root it is resolved against.
    #[error("{} is not inside project {}", path.display(), root.display())]
    NotInProject {
        /// The offending file.
        path: PathBuf,
        /// Project root.
        root: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The resolver cannot answer this kind of question at all.
    ///
    /// Distinct from "no match": the caller cannot tell whether the link matches.
    #[error("resolver does not support {capability}")]
    Unsupported {
        /// Name of the missing operation.
        capability: &'static str,
    },
}
