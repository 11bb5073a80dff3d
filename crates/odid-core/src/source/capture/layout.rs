pub const COMMENT_PREFIX: char = '#';
pub const UNKNOWN_TIMESTAMP: &str = "-";
pub const HEX_PREFIX: &str = "0x";

/// Fields per capture line: timestamp, device id, service data.
pub const FIELD_COUNT: usize = 3;

/// Application code + transport counter ahead of the message in BLE
/// service data.
pub const TRANSPORT_PREFIX_LEN: usize = 2;
