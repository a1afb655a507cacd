use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Method {0} not supported.")]
    UnsupportedProtocol(String),

    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
