use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Knowledge retrieval failed: {0}")]
    Retrieval(String),

    #[error("Web search failed: {0}")]
    WebSearch(String),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("HTTP status error: {0}")]
    HttpStatus(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Reasons the remote zero-shot classifier could not produce a usable label.
///
/// Every variant is recoverable: the caller falls back to keyword rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("remote classifier is not configured")]
    Unavailable,

    #[error("request failed: {0}")]
    Request(String),

    #[error("remote classifier returned status {0}")]
    Status(u16),

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("top label '{label}' scored {score:.3}, below threshold {threshold:.3}")]
    LowConfidence {
        label: String,
        score: f64,
        threshold: f64,
    },
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClassifierError::Request(format!("timed out: {err}"))
        } else {
            ClassifierError::Request(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
