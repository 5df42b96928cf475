use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by session setup, ingestion and rendering.
/// The registries themselves are infallible.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    #[error("malformed input spec `{0}`, expected TOOL=PATH")]
    InputSpec(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode observations from {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("failed to render report: {0}")]
    Render(String),
}
