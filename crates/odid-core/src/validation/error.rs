use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid validation config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}
