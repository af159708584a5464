use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourError {
    #[error("request to {url} failed with status {status}")]
    Request { status: u16, url: String },
    #[error("channel `{0}` does not exist")]
    ChannelNotFound(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

pub type SourResult<T> = Result<T, SourError>;
