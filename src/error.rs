use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocgenError>;

/// Failures surfaced by the documentation generator.
///
/// Everything here is a caller-visible condition; recoverable situations
/// (unknown markup constructs, highlighter failures) are handled locally and
/// never reach this enum.
#[derive(Debug, Error)]
pub enum DocgenError {
    #[error("unknown override classifier `{0}` (expected @replace, @before, @after, or @skip)")]
    UnknownClassifier(String),

    #[error("no sub-command `{segment}` under `{parent}`")]
    PathNotFound { parent: String, segment: String },

    #[error("invalid directive configuration: {0}")]
    Config(String),

    #[error("cross-reference target is empty")]
    EmptyTarget,

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
