use super::models::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArmError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{code}: {message} (HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Operation {state}: {code}: {message}")]
    OperationFailed {
        state: String,
        code: String,
        message: String,
    },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArmError>;

impl ArmError {
    /// Decode a non-success response body using the ARM error envelope
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(envelope) => ArmError::Api {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => {
                let message = if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                };
                ArmError::Api {
                    status,
                    code: "HttpError".to_string(),
                    message,
                }
            }
        }
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ArmError::Api { status, .. } => Some(*status),
            ArmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
