use thiserror::Error;

/// Failures decoding a persisted snapshot. The engine itself never fails.
///
/// Only data that is not a JSON object gets here; anything object-shaped is
/// coerced field by field.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("snapshot is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaveError>;
