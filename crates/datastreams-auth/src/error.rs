/// Errors raised while preparing or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("client ID not provided")]
    NoClientId,

    #[error("client secret not provided")]
    NoClientSecret,

    /// The client ID would break the space-separated canonical string.
    #[error("invalid client ID: must not contain whitespace")]
    InvalidClientId,

    #[error("invalid HTTP method: {0:?}")]
    InvalidHttpMethod(String),

    /// The path is empty, relative, or contains whitespace.
    #[error("invalid URL path: {0:?}")]
    InvalidPath(String),

    #[error("invalid query string: {0:?}")]
    InvalidSearch(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The system clock reads earlier than the Unix epoch.
    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
