//! Error types for stagefetch.

use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        url: String,
        reason: String,
        #[source]
        source: Option<url::ParseError>,
    },

    #[error("invalid file name {0:?}: must be a single path component")]
    InvalidFileName(String),

    #[error("no endpoints given for {0}")]
    NoEndpoints(String),

    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{url} answered with status {status}")]
    Remote { url: String, status: u16 },

    #[error("response from {url} does not match the expected shape: {source}")]
    Deserialization {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("gave up after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    #[error("all endpoints failed for {resource}")]
    AllEndpointsFailed {
        resource: String,
        #[source]
        last: Box<FetchError>,
    },

    #[error("failed to prepare staging file in {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: stagefetch_fs::Error,
    },

    #[error("failed to publish {path}: {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: stagefetch_fs::Error,
    },

    #[error("{file_name} could not be downloaded and no previous copy exists")]
    DownloadUnavailable {
        file_name: String,
        #[source]
        cause: Option<Box<FetchError>>,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientInit(#[source] BoxError),

    #[error("fetch cancelled")]
    Cancelled,

    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    pub(crate) fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        FetchError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// The innermost per-attempt error, looking through retry and fallback wrappers.
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::RetryExhausted { source, .. } => source.root(),
            FetchError::AllEndpointsFailed { last, .. } => last.root(),
            FetchError::DownloadUnavailable {
                cause: Some(cause), ..
            } => cause.root(),
            other => other,
        }
    }
}
