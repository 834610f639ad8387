use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("no active tab")]
    NoActivePage,

    #[error("page unreachable: {0}")]
    Unreachable(String),

    #[error("switch rejected by page: {0}")]
    SwitchRejected(String),

    #[error("script execution error: {0}")]
    Execution(String),

    #[error("account store error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
