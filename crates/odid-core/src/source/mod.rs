mod capture;

pub use capture::CaptureFileSource;
pub use capture::error::ServiceDataError;
pub use capture::reader::{decode_service_data, is_valid_odid_service_data, strip_transport_prefix};

use thiserror::Error;

/// One received service-data frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvent {
    pub ts: Option<f64>,
    pub device: String,
    pub data: Vec<u8>,
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<capture::error::CaptureSourceError> for SourceError {
    fn from(value: capture::error::CaptureSourceError) -> Self {
        match value {
            capture::error::CaptureSourceError::Io(err) => SourceError::Io(err),
            capture::error::CaptureSourceError::Line { line, message } => {
                SourceError::Parse { line, message }
            }
        }
    }
}
