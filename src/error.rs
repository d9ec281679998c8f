use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, StatusError>;

#[derive(Debug, Error)]
pub enum StatusError {
    /// Any network-layer failure while probing a target or fetching the manifest.
    #[error("transport failure for {url}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("could not build the HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("malformed version manifest: {reason}")]
    MalformedVersionPayload { reason: String },

    /// A cycle was requested while another one is still probing.
    #[error("a status check is already in progress")]
    CycleInProgress,

    #[error("status check failed: {reason}")]
    CycleFailed { reason: String },

    #[error("invalid service registry: {reason}")]
    InvalidRegistry { reason: String },

    #[error("invalid value for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StatusError {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StatusError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn config(key: &str, reason: impl Into<String>) -> Self {
        StatusError::Config {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
