use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafwaError {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid tab '{0}'")]
    InvalidTab(String),

    #[error("invalid image type '{0}'")]
    InvalidImageKind(String),

    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend not configured: set SAFWA_BACKEND_URL and SAFWA_BACKEND_KEY or run `safwa config set backend.url <url>`")]
    BackendNotConfigured,

    /// Non-success response from the data store or the storage API.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SafwaError>;
