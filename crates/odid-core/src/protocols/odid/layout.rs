pub const HEADER_OFFSET: usize = 0;
pub const HEADER_LEN: usize = 1;

pub const TYPE_MASK: u8 = 0xF0;
pub const TYPE_SHIFT: u8 = 4;
pub const VERSION_MASK: u8 = 0x0F;

/// Size of one single message on the wire, header byte included.
pub const MESSAGE_SIZE: usize = 25;

pub const MAX_ID_BYTE_SIZE: usize = 20;
pub const MAX_STRING_BYTE_SIZE: usize = 23;

pub const MAX_AUTH_DATA_PAGES: usize = 16;
pub const AUTH_PAGE_ZERO_SIZE: usize = 17;
pub const AUTH_PAGE_NON_ZERO_SIZE: usize = 23;
pub const MAX_AUTH_DATA: usize =
    AUTH_PAGE_ZERO_SIZE + (MAX_AUTH_DATA_PAGES - 1) * AUTH_PAGE_NON_ZERO_SIZE;

pub const PACK_FRAMING_LEN: usize = 3;
pub const MAX_MESSAGES_IN_PACK: usize = 9;
pub const MAX_MESSAGE_PACK_SIZE: usize = MESSAGE_SIZE * MAX_MESSAGES_IN_PACK;

pub const HIGH_NIBBLE: u8 = 0xF0;
pub const LOW_NIBBLE: u8 = 0x0F;

// Location status byte.
pub const LOCATION_HEIGHT_TYPE_BIT: u8 = 2;
pub const LOCATION_EW_DIRECTION_BIT: u8 = 1;
pub const LOCATION_SPEED_MULT_BIT: u8 = 0;

// System flags byte.
pub const SYSTEM_OPERATOR_LOCATION_MASK: u8 = 0x03;
pub const SYSTEM_CLASSIFICATION_MASK: u8 = 0x1C;
pub const SYSTEM_CLASSIFICATION_SHIFT: u8 = 2;

pub const LAT_LON_SCALE: f64 = 1e-7;
pub const SPEED_SCALE_LOW: f64 = 0.25;
pub const SPEED_SCALE_HIGH: f64 = 0.75;
pub const SPEED_HIGH_OFFSET: f64 = 255.0 * SPEED_SCALE_LOW;
pub const VERTICAL_SPEED_SCALE: f64 = 0.5;
pub const ALTITUDE_SCALE: f64 = 0.5;
pub const ALTITUDE_OFFSET_M: f64 = 1000.0;

/// Bytes each payload decoder consumes after the header byte.
pub const BASIC_ID_LEN: usize = 1 + MAX_ID_BYTE_SIZE;
pub const LOCATION_LEN: usize = 23;
pub const AUTH_LEN: usize = 1 + 6 + AUTH_PAGE_ZERO_SIZE;
pub const SELF_ID_LEN: usize = 1 + MAX_STRING_BYTE_SIZE;
pub const SYSTEM_LEN: usize = 23;
pub const OPERATOR_ID_LEN: usize = 1 + MAX_ID_BYTE_SIZE;

pub const DELIM: char = ',';

pub const fn high_nibble(value: u8) -> u8 {
    (value & HIGH_NIBBLE) >> 4
}

pub const fn low_nibble(value: u8) -> u8 {
    value & LOW_NIBBLE
}

pub const fn bit(value: u8, index: u8) -> u8 {
    (value >> index) & 0x01
}
