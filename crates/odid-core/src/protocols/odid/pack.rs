use super::error::OdidError;
use super::header::{Header, MessageType};
use super::layout;
use super::reader::OdidReader;
use super::types::MessagePack;

/// Decode message-pack framing starting at the pack header byte.
///
/// Framing is checked in order (message size, message count, available
/// bytes) and any failure rejects the whole pack. The sub-messages are
/// returned as raw bytes; expansion happens in the assembler.
pub fn parse_message_pack(reader: &mut OdidReader<'_>) -> Result<MessagePack, OdidError> {
    let available = reader.remaining();
    let header = Header::read(reader)?;
    if header.msg_type != MessageType::MessagePack {
        return Err(OdidError::UnrecognizedType {
            value: header.msg_type.nibble(),
        });
    }
    let message_size = reader.read_u8()?;
    let messages_in_pack = reader.read_u8()?;

    let needed =
        layout::PACK_FRAMING_LEN + message_size as usize * messages_in_pack as usize;
    let framing_error = OdidError::PackFramingInvalid {
        message_size,
        messages_in_pack,
        needed,
        actual: available,
    };
    if message_size as usize != layout::MESSAGE_SIZE {
        return Err(framing_error);
    }
    if messages_in_pack == 0 || messages_in_pack as usize > layout::MAX_MESSAGES_IN_PACK {
        return Err(framing_error);
    }
    if available < needed {
        return Err(framing_error);
    }

    let body_len = needed - layout::PACK_FRAMING_LEN;
    debug_assert!(body_len <= layout::MAX_MESSAGE_PACK_SIZE);
    let messages = reader.read_slice(body_len)?.to_vec();
    Ok(MessagePack {
        message_size,
        messages_in_pack,
        messages,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_message_pack;
    use crate::protocols::odid::error::OdidError;
    use crate::protocols::odid::layout;
    use crate::protocols::odid::reader::OdidReader;

    fn pack_bytes(message_size: u8, count: u8, body_len: usize) -> Vec<u8> {
        let mut data = vec![0xF2, message_size, count];
        data.extend(std::iter::repeat_n(0x00, body_len));
        data
    }

    #[test]
    fn accepts_full_pack() {
        let data = pack_bytes(25, 9, layout::MAX_MESSAGE_PACK_SIZE);
        assert_eq!(data.len(), 228);
        let mut reader = OdidReader::new(&data);
        let pack = parse_message_pack(&mut reader).unwrap();
        assert_eq!(pack.messages_in_pack, 9);
        assert_eq!(pack.messages.len(), 225);
        assert_eq!(reader.position(), 228);
    }

    #[test]
    fn rejects_one_byte_short() {
        let data = pack_bytes(25, 9, layout::MAX_MESSAGE_PACK_SIZE - 1);
        let mut reader = OdidReader::new(&data);
        let err = parse_message_pack(&mut reader).unwrap_err();
        assert_eq!(
            err,
            OdidError::PackFramingInvalid {
                message_size: 25,
                messages_in_pack: 9,
                needed: 228,
                actual: 227,
            }
        );
    }

    #[test]
    fn rejects_wrong_message_size() {
        let data = pack_bytes(24, 1, 64);
        let mut reader = OdidReader::new(&data);
        assert!(matches!(
            parse_message_pack(&mut reader),
            Err(OdidError::PackFramingInvalid { message_size: 24, .. })
        ));
    }

    #[test]
    fn rejects_count_out_of_range() {
        for count in [0u8, 10] {
            let data = pack_bytes(25, count, 300);
            let mut reader = OdidReader::new(&data);
            assert!(matches!(
                parse_message_pack(&mut reader),
                Err(OdidError::PackFramingInvalid { .. })
            ));
        }
    }

    #[test]
    fn ignores_trailing_bytes_beyond_declared_count() {
        let data = pack_bytes(25, 1, 40);
        let mut reader = OdidReader::new(&data);
        let pack = parse_message_pack(&mut reader).unwrap();
        assert_eq!(pack.messages.len(), 25);
        assert_eq!(reader.remaining(), 15);
    }
}
