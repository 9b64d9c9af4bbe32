use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeilaoError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeilaoError {
    fn from(e: serde_json::Error) -> Self {
        LeilaoError::SerializationError(e.to_string())
    }
}
