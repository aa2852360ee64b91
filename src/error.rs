use thiserror::Error;

/// Errors surfaced by a drill run.
///
/// Malformed numeric answers never show up here; they are handled by the
/// re-prompt loop in [`crate::input`].
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("config file is not valid json: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Input stream ended while an answer was expected.
    #[error("input closed while waiting for an answer")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, DrillError>;
