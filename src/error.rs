use std::path::PathBuf;

/// Result type alias for typed pipeline errors
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the generator.
///
/// Only the failures that abort a run are typed: invalid configuration
/// (detected before any file I/O) and an unreadable routes directory.
/// Per-route failures during processing are logged and counted instead.
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration (provider, API key, format, servers)
    Config(String),
    /// The routes directory itself could not be enumerated
    Discovery {
        dir: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Discovery { dir, source } => {
                write!(f, "Failed to read routes directory {}: {}", dir.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Discovery { source, .. } => Some(source),
            Error::Config(_) => None,
        }
    }
}
