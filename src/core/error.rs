use thiserror::Error;

/// Every way resolving or downloading a stream can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid YouTube URL")]
    InvalidUrl,

    #[error("video unavailable: {reason}")]
    VideoUnavailable { reason: String },

    #[error("no suitable stream found")]
    NoSuitableStream,

    #[error("network timeout")]
    Timeout,

    #[error("download canceled")]
    Cancelled,

    #[error("HTTP {0}")]
    Http(reqwest::StatusCode),

    #[error(transparent)]
    Network(reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not parse player response: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::VideoUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http(status)
        } else {
            Self::Network(err)
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
