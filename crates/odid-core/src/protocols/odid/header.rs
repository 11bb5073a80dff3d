use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::OdidError;
use super::layout;
use super::reader::OdidReader;

/// Message type carried in the high nibble of the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    BasicId,
    Location,
    Auth,
    SelfId,
    System,
    OperatorId,
    MessagePack,
}

impl MessageType {
    pub fn from_nibble(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(Self::BasicId),
            0x1 => Some(Self::Location),
            0x2 => Some(Self::Auth),
            0x3 => Some(Self::SelfId),
            0x4 => Some(Self::System),
            0x5 => Some(Self::OperatorId),
            0xF => Some(Self::MessagePack),
            _ => None,
        }
    }

    pub fn nibble(self) -> u8 {
        match self {
            Self::BasicId => 0x0,
            Self::Location => 0x1,
            Self::Auth => 0x2,
            Self::SelfId => 0x3,
            Self::System => 0x4,
            Self::OperatorId => 0x5,
            Self::MessagePack => 0xF,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BasicId => "basic_id",
            Self::Location => "location",
            Self::Auth => "auth",
            Self::SelfId => "self_id",
            Self::System => "system",
            Self::OperatorId => "operator_id",
            Self::MessagePack => "message_pack",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded header byte: type in the high nibble, protocol version in the low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub msg_type: MessageType,
    pub version: u8,
}

impl Header {
    pub fn from_byte(byte: u8) -> Result<Self, OdidError> {
        let value = (byte & layout::TYPE_MASK) >> layout::TYPE_SHIFT;
        let msg_type = MessageType::from_nibble(value).ok_or(OdidError::UnrecognizedType { value })?;
        Ok(Self {
            msg_type,
            version: byte & layout::VERSION_MASK,
        })
    }

    pub(crate) fn read(reader: &mut OdidReader<'_>) -> Result<Self, OdidError> {
        Self::from_byte(reader.read_u8()?)
    }
}

/// Decode the header from the first byte of `data`.
///
/// # Examples
/// ```
/// use odid_core::{MessageType, parse_header};
///
/// let header = parse_header(&[0x12]).unwrap();
/// assert_eq!(header.msg_type, MessageType::Location);
/// assert_eq!(header.version, 2);
/// assert!(parse_header(&[]).is_err());
/// assert!(parse_header(&[0x60]).is_err());
/// ```
pub fn parse_header(data: &[u8]) -> Result<Header, OdidError> {
    let mut reader = OdidReader::at(data, layout::HEADER_OFFSET);
    Header::read(&mut reader)
}

/// Whether `data` starts with a recognizable Open Drone ID header.
pub fn is_valid_odid(data: &[u8]) -> bool {
    parse_header(data).is_ok()
}
