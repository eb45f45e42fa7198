use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("action name is required")]
    MissingName,

    #[error("at least one action step is required")]
    MissingSteps,

    #[error("direction cannot be determined from a zero vector")]
    ZeroVector,

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{path}: {status} {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fling gesture did not complete")]
    GestureIncomplete,

    #[error("no scheduled action named {0:?}")]
    ActionNotFound(String),

    #[error("element reference missing from response")]
    MissingElementId,

    #[error("screenshot is not valid base64: {0}")]
    Screenshot(#[from] base64::DecodeError),
}

impl Error {
    /// True for failures detected locally, before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingName | Error::MissingSteps | Error::ZeroVector
        )
    }
}
