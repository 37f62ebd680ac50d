use std::path::PathBuf;

/// Errors raised while loading a lexicon file
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// The file could not be read
    #[error("Failed to read lexicon '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON
    #[error("Failed to parse JSON from '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The JSON root is something other than an object
    #[error("Invalid lexicon in '{}': root must be an object", .path.display())]
    NotAnObject { path: PathBuf },
}
