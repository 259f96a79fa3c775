use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Rejected(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

impl ClientError {
    /// Message suitable for showing next to the action that failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "The requested record does not exist".to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Server { .. } | Self::RequestError(_) => {
                format!("Could not reach the server: {self}")
            }
        }
    }
}
