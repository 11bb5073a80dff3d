use odid_core::{
    Decoded, MessageType, OdidError, Payload, ValidationConfig, decode, decode_messages,
    is_valid_odid, validate_payload,
};

fn message(header: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![header];
    out.extend_from_slice(body);
    out.resize(25, 0);
    out
}

fn location(speed_flags: u8, speed_horizontal: u8, lat: i32, lon: i32, height: u16) -> Vec<u8> {
    let mut body = vec![0x20 | speed_flags, 0, speed_horizontal, 4];
    body.extend_from_slice(&lat.to_le_bytes());
    body.extend_from_slice(&lon.to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&height.to_le_bytes());
    message(0x12, &body)
}

fn operator(id: &[u8]) -> Vec<u8> {
    let mut body = vec![0x00];
    body.extend_from_slice(id);
    message(0x52, &body)
}

fn pack(sub_messages: &[Vec<u8>], declared: u8) -> Vec<u8> {
    let mut out = vec![0xF2, 25, declared];
    for sub in sub_messages {
        out.extend_from_slice(sub);
    }
    out
}

fn single_location(data: &[u8]) -> odid_core::Location {
    let decoded = decode(data, 0, 0.0, 0).expect("location decodes");
    match &decoded.messages()[0].payload {
        Payload::Location(location) => location.clone(),
        other => panic!("expected location, got {:?}", other.kind()),
    }
}

#[test]
fn buffers_shorter_than_one_message_never_decode() {
    let full = operator(b"FAA12345");
    for len in 0..25 {
        assert!(decode(&full[..len], 0, 0.0, 0).is_err(), "len {len}");
        assert!(decode_messages(&full[..len], 0, 0.0, 0).is_empty());
    }
    assert_eq!(decode_messages(&full, 0, 0.0, 0).len(), 1);
}

#[test]
fn reserved_type_nibbles_are_rejected() {
    for nibble in 6u8..=14 {
        let data = message(nibble << 4, &[]);
        assert!(!is_valid_odid(&data));
        assert_eq!(
            decode(&data, 0, 0.0, 0).unwrap_err(),
            OdidError::UnrecognizedType { value: nibble }
        );
    }
}

#[test]
fn horizontal_speed_uses_both_segments() {
    let low = single_location(&location(0x00, 40, 0, 0, 0));
    assert_eq!(format!("{:.2}", low.horizontal_speed_mps()), "10.00");
    let high = single_location(&location(0x01, 40, 0, 0, 0));
    assert_eq!(format!("{:.2}", high.horizontal_speed_mps()), "93.75");
}

#[test]
fn location_derived_values() {
    let fix = single_location(&location(0, 0, 377_749_000, -1_224_194_000, 2200));
    assert_eq!(format!("{:.7}", fix.latitude_deg()), "37.7749000");
    assert_eq!(format!("{:.7}", fix.longitude_deg()), "-122.4194000");
    assert_eq!(format!("{:.2}", fix.altitude_m()), "100.00");
    assert_eq!(fix.status, 2);
    assert_eq!(fix.distance, 0);
}

#[test]
fn full_pack_expands_with_consecutive_counters() {
    let subs: Vec<Vec<u8>> = (0..9).map(|_| operator(b"FAA12345")).collect();
    let data = pack(&subs, 9);
    assert_eq!(data.len(), 228);

    let decoded = decode(&data, 0, 12.5, 100).unwrap();
    let messages = decoded.messages();
    assert_eq!(messages.len(), 9);
    for (i, message) in messages.iter().enumerate() {
        assert_eq!(message.sequence_counter, 100 + i as u32);
        assert_eq!(message.observed_at, 12.5);
        assert_eq!(message.kind(), MessageType::OperatorId);
    }
    assert_eq!(decoded.counters_used(), 9);
}

#[test]
fn pack_one_byte_short_is_rejected_whole() {
    let subs: Vec<Vec<u8>> = (0..9).map(|_| operator(b"FAA12345")).collect();
    let mut data = pack(&subs, 9);
    data.pop();
    assert_eq!(data.len(), 227);

    assert!(matches!(
        decode(&data, 0, 0.0, 0),
        Err(OdidError::PackFramingInvalid { needed: 228, actual: 227, .. })
    ));
    assert!(decode_messages(&data, 0, 0.0, 0).is_empty());
}

#[test]
fn pack_framing_ranges() {
    let sub = operator(b"FAA12345");
    let mut wrong_size = pack(&[sub.clone()], 1);
    wrong_size[1] = 24;
    assert!(decode(&wrong_size, 0, 0.0, 0).is_err());

    let empty = pack(&[sub.clone()], 0);
    assert!(decode(&empty, 0, 0.0, 0).is_err());

    let subs: Vec<Vec<u8>> = (0..10).map(|_| sub.clone()).collect();
    assert!(decode(&pack(&subs, 10), 0, 0.0, 0).is_err());
}

#[test]
fn bad_sub_message_is_skipped_and_counter_kept() {
    let subs = vec![
        operator(b"FAA12345"),
        message(0x70, &[]),
        operator(b"NASA54321"),
    ];
    let decoded = decode(&pack(&subs, 3), 0, 0.0, 10).unwrap();
    let Decoded::Pack(expansion) = &decoded else {
        panic!("expected pack expansion");
    };
    let counters: Vec<u32> = expansion.messages.iter().map(|m| m.sequence_counter).collect();
    assert_eq!(counters, vec![10, 12]);
    assert_eq!(expansion.skipped.len(), 1);
    assert_eq!(expansion.skipped[0].index, 1);
    assert_eq!(expansion.skipped[0].sequence_counter, 11);
    assert_eq!(
        expansion.skipped[0].reason,
        OdidError::UnrecognizedType { value: 7 }
    );
}

#[test]
fn distance_warning_names_the_distance() {
    let config = ValidationConfig::default();
    let far = single_location(&location(0, 0, 400_000_000, -740_000_000, 2200));
    let warnings = validate_payload(&Payload::Location(far), &config);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("4146238.71"), "{}", warnings[0]);

    let near = single_location(&location(0, 0, 377_749_000, -1_224_194_000, 2200));
    assert!(validate_payload(&Payload::Location(near), &config).is_empty());
}

#[test]
fn operator_allow_list() {
    let config = ValidationConfig::default();
    let listed = decode_messages(&operator(b"NASA54321"), 0, 0.0, 0);
    assert!(validate_payload(&listed[0].payload, &config).is_empty());

    let unknown = decode_messages(&operator(b"ACME0001"), 0, 0.0, 0);
    let warnings = validate_payload(&unknown[0].payload, &config);
    assert_eq!(warnings, vec!["Operator ID is not in the allow list: ACME0001".to_string()]);
}

#[test]
fn csv_lines_end_with_delimiter() {
    let messages = decode_messages(&operator(b"FAA12345"), 0, 0.0, 0);
    assert_eq!(messages[0].to_csv(), "0,FAA12345,");

    let basic = message(0x02, &[0x12, b'A', b'B', b'C']);
    let messages = decode_messages(&basic, 0, 0.0, 0);
    assert_eq!(messages[0].to_csv(), "1,2,ABC,");
}
