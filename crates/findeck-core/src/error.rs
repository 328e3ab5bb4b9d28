use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinDeckError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Index out of range: {collection}[{index}] (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinDeckError {
    fn from(e: serde_json::Error) -> Self {
        FinDeckError::SerializationError(e.to_string())
    }
}
