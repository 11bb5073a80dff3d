use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
}

/// Errors returned when turning service-data text into bytes.
///
/// # Examples
/// ```
/// use odid_core::{ServiceDataError, decode_service_data};
///
/// assert!(matches!(decode_service_data(""), Err(ServiceDataError::Empty)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceDataError {
    #[error("service data is empty")]
    Empty,
    #[error("service data is neither hex nor base64: {0}")]
    Encoding(String),
}
