use serde::Serialize;

use super::error::OdidError;
use super::header::{Header, MessageType};
use super::layout;
use super::pack::parse_message_pack;
use super::parser::{
    parse_authentication, parse_basic_id, parse_location, parse_operator_id, parse_self_id,
    parse_system,
};
use super::reader::OdidReader;
use super::types::{Message, MessagePack, Payload};

/// Result of decoding one buffer: a single message, or an expanded pack.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Single(Message),
    Pack(PackExpansion),
}

impl Decoded {
    pub fn messages(&self) -> &[Message] {
        match self {
            Decoded::Single(message) => std::slice::from_ref(message),
            Decoded::Pack(expansion) => &expansion.messages,
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Decoded::Single(message) => vec![message],
            Decoded::Pack(expansion) => expansion.messages,
        }
    }

    /// Number of sequence counters this decode consumed.
    pub fn counters_used(&self) -> u32 {
        match self {
            Decoded::Single(_) => 1,
            Decoded::Pack(expansion) => expansion.pack.messages_in_pack as u32,
        }
    }
}

/// Messages salvaged from a pack plus a record of every sub-message dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PackExpansion {
    pub header: Header,
    pub pack: MessagePack,
    pub messages: Vec<Message>,
    pub skipped: Vec<SkippedSubMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSubMessage {
    pub index: usize,
    pub sequence_counter: u32,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: OdidError,
}

/// Decode one message at `offset` without expanding packs.
///
/// At least one full message (25 bytes) must remain from `offset`. A pack is
/// returned with its sub-messages left as raw bytes.
pub fn decode_message(
    data: &[u8],
    offset: usize,
    observed_at: f64,
    sequence_counter: u32,
) -> Result<Message, OdidError> {
    let mut reader = OdidReader::at(data, offset);
    reader.require_remaining(layout::MESSAGE_SIZE)?;

    let header = Header::read(&mut reader)?;
    let payload = match header.msg_type {
        MessageType::BasicId => Payload::BasicId(parse_basic_id(&mut reader)?),
        MessageType::Location => Payload::Location(parse_location(&mut reader)?),
        MessageType::Auth => Payload::Auth(parse_authentication(&mut reader)?),
        MessageType::SelfId => Payload::SelfId(parse_self_id(&mut reader)?),
        MessageType::System => Payload::System(parse_system(&mut reader)?),
        MessageType::OperatorId => Payload::OperatorId(parse_operator_id(&mut reader)?),
        MessageType::MessagePack => {
            let mut pack_reader = OdidReader::new(&data[offset..]);
            Payload::MessagePack(parse_message_pack(&mut pack_reader)?)
        }
    };
    if let Some(len) = body_len(header.msg_type) {
        debug_assert_eq!(reader.position() - offset, layout::HEADER_LEN + len);
    }

    Ok(Message {
        sequence_counter,
        observed_at,
        header,
        payload,
    })
}

/// Bytes a single-message body occupies after the header; packs are framed
/// separately.
fn body_len(msg_type: MessageType) -> Option<usize> {
    match msg_type {
        MessageType::BasicId => Some(layout::BASIC_ID_LEN),
        MessageType::Location => Some(layout::LOCATION_LEN),
        MessageType::Auth => Some(layout::AUTH_LEN),
        MessageType::SelfId => Some(layout::SELF_ID_LEN),
        MessageType::System => Some(layout::SYSTEM_LEN),
        MessageType::OperatorId => Some(layout::OPERATOR_ID_LEN),
        MessageType::MessagePack => None,
    }
}

/// Decode the buffer at `offset`, expanding a message pack one level.
///
/// Sub-message `i` gets counter `sequence_counter + i` and the same
/// timestamp. A sub-message that fails to decode is recorded in
/// `PackExpansion::skipped` and the rest are still returned.
///
/// # Examples
/// ```
/// use odid_core::decode;
///
/// let mut frame = vec![0x52, 0x00];
/// frame.extend_from_slice(b"FAA12345");
/// frame.resize(25, 0);
///
/// let decoded = decode(&frame, 0, 0.0, 7).unwrap();
/// assert_eq!(decoded.messages().len(), 1);
/// assert_eq!(decoded.messages()[0].sequence_counter, 7);
/// assert!(decode(&frame[..24], 0, 0.0, 7).is_err());
/// ```
pub fn decode(
    data: &[u8],
    offset: usize,
    observed_at: f64,
    sequence_counter: u32,
) -> Result<Decoded, OdidError> {
    let message = decode_message(data, offset, observed_at, sequence_counter)?;
    let Message {
        header, payload, ..
    } = message;
    match payload {
        Payload::MessagePack(pack) => Ok(Decoded::Pack(expand_pack(
            header,
            pack,
            observed_at,
            sequence_counter,
        ))),
        payload => Ok(Decoded::Single(Message {
            sequence_counter,
            observed_at,
            header,
            payload,
        })),
    }
}

/// Decode and flatten; any top-level failure yields no messages.
pub fn decode_messages(
    data: &[u8],
    offset: usize,
    observed_at: f64,
    sequence_counter: u32,
) -> Vec<Message> {
    match decode(data, offset, observed_at, sequence_counter) {
        Ok(decoded) => decoded.into_messages(),
        Err(err) => {
            tracing::debug!(error = %err, offset, "no message decoded");
            Vec::new()
        }
    }
}

fn expand_pack(
    header: Header,
    pack: MessagePack,
    observed_at: f64,
    base_counter: u32,
) -> PackExpansion {
    let mut messages = Vec::with_capacity(pack.messages_in_pack as usize);
    let mut skipped = Vec::new();

    for (index, chunk) in pack.sub_messages().enumerate() {
        let sequence_counter = base_counter.wrapping_add(index as u32);
        let result = decode_message(chunk, 0, observed_at, sequence_counter).and_then(|message| {
            if message.kind() == MessageType::MessagePack {
                Err(OdidError::NestedPack)
            } else {
                Ok(message)
            }
        });
        match result {
            Ok(message) => messages.push(message),
            Err(reason) => {
                tracing::debug!(index, sequence_counter, reason = %reason, "skipping pack sub-message");
                skipped.push(SkippedSubMessage {
                    index,
                    sequence_counter,
                    reason,
                });
            }
        }
    }

    PackExpansion {
        header,
        pack,
        messages,
        skipped,
    }
}

fn serialize_reason<S: serde::Serializer>(reason: &OdidError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}
