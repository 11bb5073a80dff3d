use thiserror::Error;

/// Errors returned by Open Drone ID decoding.
///
/// None of these are fatal: the assembler turns a top-level failure into
/// "no message" and a sub-message failure into a skipped entry.
///
/// # Examples
/// ```
/// use odid_core::OdidError;
///
/// let err = OdidError::UnrecognizedType { value: 7 };
/// assert!(err.to_string().contains("unrecognized message type"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OdidError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("unrecognized message type: {value}")]
    UnrecognizedType { value: u8 },
    #[error(
        "invalid message pack framing: size {message_size}, count {messages_in_pack}, need {needed} bytes, got {actual}"
    )]
    PackFramingInvalid {
        message_size: u8,
        messages_in_pack: u8,
        needed: usize,
        actual: usize,
    },
    #[error("message pack nested inside a message pack")]
    NestedPack,
}
