use thiserror::Error;

/// Why a link could not be turned into a video identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unparseable link: no \"v=\" marker in {0:?}")]
    MissingMarker(String),

    #[error("unparseable link: empty video identifier in {0:?}")]
    EmptyIdentifier(String),
}

/// Failures from the caption service. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("no captions available for video {0}")]
    NoCaptions(String),

    #[error("no transcript in [{}] for video {video_id} (available: [{}])", requested.join(", "), available.join(", "))]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("network error while fetching captions: {0}")]
    Network(String),

    #[error("unexpected caption service response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

/// Failures from the generative model, split by whether a retry can help
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("generation failed ({code}): {message}")]
    Fatal { code: String, message: String },
}

impl GenerationError {
    pub fn fatal(code: impl Into<String>, message: impl Into<String>) -> Self {
        GenerationError::Fatal {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Deadline and internal-server failures are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::DeadlineExceeded(_) | GenerationError::Internal(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key: set {0} in the environment or a .env file")]
    MissingApiKey(&'static str),

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
