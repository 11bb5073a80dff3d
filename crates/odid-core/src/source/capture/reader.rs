use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::error::ServiceDataError;
use super::layout;
use crate::protocols::odid::is_valid_odid;
use crate::protocols::odid::layout::MESSAGE_SIZE;

/// Decode service data given as hex (optionally `0x`-prefixed) or base64.
///
/// Text that is valid hex is always read as hex.
///
/// # Examples
/// ```
/// use odid_core::decode_service_data;
///
/// assert_eq!(decode_service_data("0x0d01").unwrap(), vec![0x0d, 0x01]);
/// assert_eq!(decode_service_data("DQE=").unwrap(), vec![0x0d, 0x01]);
/// ```
pub fn decode_service_data(text: &str) -> Result<Vec<u8>, ServiceDataError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceDataError::Empty);
    }
    let hex_body = text.strip_prefix(layout::HEX_PREFIX).unwrap_or(text);
    if looks_like_hex(hex_body) {
        return hex::decode(hex_body).map_err(|e| ServiceDataError::Encoding(e.to_string()));
    }
    STANDARD
        .decode(text)
        .map_err(|e| ServiceDataError::Encoding(e.to_string()))
}

/// Drop the transport prefix carried by service data longer than one message.
pub fn strip_transport_prefix(data: &[u8]) -> &[u8] {
    if data.len() <= MESSAGE_SIZE {
        data
    } else {
        &data[layout::TRANSPORT_PREFIX_LEN..]
    }
}

/// Header check on service-data text; any decoding failure is `false`.
pub fn is_valid_odid_service_data(text: &str) -> bool {
    match decode_service_data(text) {
        Ok(data) => is_valid_odid(strip_transport_prefix(&data)),
        Err(_) => false,
    }
}

fn looks_like_hex(text: &str) -> bool {
    !text.is_empty() && text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_hexdigit())
}
