use super::error::OdidError;
use super::layout::{self, bit, high_nibble, low_nibble};
use super::reader::OdidReader;
use super::types::{
    AuthMetadata, Authentication, BasicId, Location, OperatorId, SelfId, SystemMsg,
};

// Decoders start right after the header byte and consume a fixed footprint.
// The assembler has already checked that a full message is present.

pub fn parse_basic_id(reader: &mut OdidReader<'_>) -> Result<BasicId, OdidError> {
    let type_byte = reader.read_u8()?;
    let uas_id = reader.read_array()?;
    Ok(BasicId {
        id_type: high_nibble(type_byte),
        ua_type: low_nibble(type_byte),
        uas_id,
    })
}

pub fn parse_location(reader: &mut OdidReader<'_>) -> Result<Location, OdidError> {
    let flags = reader.read_u8()?;
    let direction = reader.read_u8()?;
    let speed_horizontal = reader.read_u8()?;
    let speed_vertical = reader.read_u8()?;
    let latitude = reader.read_i32_le()?;
    let longitude = reader.read_i32_le()?;
    let altitude_pressure = reader.read_u16_le()?;
    let altitude_geodetic = reader.read_u16_le()?;
    let height = reader.read_u16_le()?;
    let hv_accuracy = reader.read_u8()?;
    let baro_speed_accuracy = reader.read_u8()?;
    let timestamp = reader.read_u16_le()?;
    let time_accuracy = low_nibble(reader.read_u8()?);

    Ok(Location {
        status: high_nibble(flags),
        height_type: bit(flags, layout::LOCATION_HEIGHT_TYPE_BIT),
        ew_direction: bit(flags, layout::LOCATION_EW_DIRECTION_BIT),
        speed_mult: bit(flags, layout::LOCATION_SPEED_MULT_BIT),
        direction,
        speed_horizontal,
        speed_vertical,
        latitude,
        longitude,
        altitude_pressure,
        altitude_geodetic,
        height,
        horizontal_accuracy: low_nibble(hv_accuracy),
        vertical_accuracy: high_nibble(hv_accuracy),
        baro_accuracy: high_nibble(baro_speed_accuracy),
        speed_accuracy: low_nibble(baro_speed_accuracy),
        timestamp,
        time_accuracy,
        distance: 0,
    })
}

/// Decode one authentication page.
///
/// Page 0 carries the metadata and the first 17 data bytes; every later page
/// carries 23 data bytes. The page is written at its own offset inside a
/// fresh aggregate buffer, so other pages stay zeroed.
pub fn parse_authentication(reader: &mut OdidReader<'_>) -> Result<Authentication, OdidError> {
    let type_byte = reader.read_u8()?;
    let auth_type = high_nibble(type_byte);
    let page_index = low_nibble(type_byte);

    let metadata = if page_index == 0 {
        let last_page_index = reader.read_u8()?;
        let length = reader.read_u8()?;
        let timestamp = reader.read_u32_le()?;
        Some(AuthMetadata {
            last_page_index,
            length,
            timestamp,
        })
    } else {
        None
    };

    let range = Authentication::page_range(page_index);
    let page = reader.read_slice(range.len())?;
    let mut data = [0u8; layout::MAX_AUTH_DATA];
    data[range].copy_from_slice(page);

    Ok(Authentication {
        auth_type,
        page_index,
        metadata,
        data,
    })
}

pub fn parse_self_id(reader: &mut OdidReader<'_>) -> Result<SelfId, OdidError> {
    let description_type = reader.read_u8()?;
    let description = reader.read_array()?;
    Ok(SelfId {
        description_type,
        description,
    })
}

pub fn parse_system(reader: &mut OdidReader<'_>) -> Result<SystemMsg, OdidError> {
    let flags = reader.read_u8()?;
    let operator_latitude = reader.read_i32_le()?;
    let operator_longitude = reader.read_i32_le()?;
    let area_count = reader.read_u16_le()?;
    let area_radius = reader.read_u8()?;
    let area_ceiling = reader.read_u16_le()?;
    let area_floor = reader.read_u16_le()?;
    let class_byte = reader.read_u8()?;
    let operator_altitude_geo = reader.read_u16_le()?;
    let system_timestamp = reader.read_u32_le()?;

    Ok(SystemMsg {
        operator_location_type: flags & layout::SYSTEM_OPERATOR_LOCATION_MASK,
        classification_type: (flags & layout::SYSTEM_CLASSIFICATION_MASK)
            >> layout::SYSTEM_CLASSIFICATION_SHIFT,
        operator_latitude,
        operator_longitude,
        area_count,
        area_radius,
        area_ceiling,
        area_floor,
        category: high_nibble(class_byte),
        class_value: low_nibble(class_byte),
        operator_altitude_geo,
        system_timestamp,
    })
}

pub fn parse_operator_id(reader: &mut OdidReader<'_>) -> Result<OperatorId, OdidError> {
    let operator_id_type = reader.read_u8()?;
    let operator_id = reader.read_array()?;
    Ok(OperatorId {
        operator_id_type,
        operator_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(bytes: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; layout::MESSAGE_SIZE - layout::HEADER_LEN];
        out[..bytes.len()].copy_from_slice(bytes);
        out
    }

    #[test]
    fn basic_id_splits_type_nibbles() {
        let mut raw = vec![0x12];
        raw.extend_from_slice(b"1596F350457284\0\0\0\0\0\0");
        let data = body(&raw);
        let mut reader = OdidReader::new(&data);
        let basic = parse_basic_id(&mut reader).unwrap();
        assert_eq!(basic.id_type, 1);
        assert_eq!(basic.ua_type, 2);
        assert_eq!(basic.uas_id(), "1596F350457284");
        assert_eq!(reader.position(), layout::BASIC_ID_LEN);
    }

    #[test]
    fn location_fields_and_derived_values() {
        let mut raw = vec![0x25, 90, 40, 6];
        raw.extend_from_slice(&377_749_000i32.to_le_bytes());
        raw.extend_from_slice(&(-1_224_194_000i32).to_le_bytes());
        raw.extend_from_slice(&2100u16.to_le_bytes());
        raw.extend_from_slice(&2150u16.to_le_bytes());
        raw.extend_from_slice(&2200u16.to_le_bytes());
        raw.push(0xB4);
        raw.push(0x31);
        raw.extend_from_slice(&1234u16.to_le_bytes());
        raw.push(0xF7);
        let data = body(&raw);

        let mut reader = OdidReader::new(&data);
        let loc = parse_location(&mut reader).unwrap();
        assert_eq!(reader.position(), layout::LOCATION_LEN);
        assert_eq!(loc.status, 2);
        assert_eq!(loc.height_type, 1);
        assert_eq!(loc.ew_direction, 0);
        assert_eq!(loc.speed_mult, 1);
        assert_eq!(loc.direction, 90);
        assert_eq!(loc.speed_horizontal, 40);
        assert_eq!(loc.speed_vertical, 6);
        assert_eq!(loc.altitude_pressure, 2100);
        assert_eq!(loc.altitude_geodetic, 2150);
        assert_eq!(loc.height, 2200);
        assert_eq!(loc.horizontal_accuracy, 4);
        assert_eq!(loc.vertical_accuracy, 0xB);
        assert_eq!(loc.baro_accuracy, 3);
        assert_eq!(loc.speed_accuracy, 1);
        assert_eq!(loc.timestamp, 1234);
        assert_eq!(loc.time_accuracy, 7);
        assert_eq!(loc.distance, 0);

        assert!((loc.latitude_deg() - 37.7749).abs() < 1e-9);
        assert!((loc.longitude_deg() + 122.4194).abs() < 1e-9);
        assert!((loc.altitude_m() - 100.0).abs() < 1e-9);
        assert!((loc.horizontal_speed_mps() - 93.75).abs() < 1e-9);
        assert!((loc.vertical_speed_mps() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn auth_page_zero_carries_metadata() {
        let mut raw = vec![0x30, 2, 51];
        raw.extend_from_slice(&0x0102_0304u32.to_le_bytes());
        raw.extend((1..=17).collect::<Vec<u8>>());
        let data = body(&raw);

        let mut reader = OdidReader::new(&data);
        let auth = parse_authentication(&mut reader).unwrap();
        assert_eq!(reader.position(), layout::AUTH_LEN);
        assert_eq!(auth.auth_type, 3);
        assert_eq!(auth.page_index, 0);
        let meta = auth.metadata.unwrap();
        assert_eq!(meta.last_page_index, 2);
        assert_eq!(meta.length, 51);
        assert_eq!(meta.timestamp, 0x0102_0304);
        assert_eq!(&auth.data[..17], (1..=17).collect::<Vec<u8>>().as_slice());
        assert!(auth.data[17..].iter().all(|b| *b == 0));
    }

    #[test]
    fn auth_later_page_lands_at_its_offset() {
        let mut raw = vec![0x32];
        raw.extend([0xAB; 23]);
        let data = body(&raw);

        let mut reader = OdidReader::new(&data);
        let auth = parse_authentication(&mut reader).unwrap();
        assert_eq!(reader.position(), layout::AUTH_LEN);
        assert_eq!(auth.page_index, 2);
        assert!(auth.metadata.is_none());
        assert!(auth.data[..40].iter().all(|b| *b == 0));
        assert!(auth.data[40..63].iter().all(|b| *b == 0xAB));
        assert!(auth.data[63..].iter().all(|b| *b == 0));
        assert_eq!(auth.page_bytes(), &[0xAB; 23]);
    }

    #[test]
    fn self_id_reads_full_description() {
        let mut raw = vec![0x01];
        raw.extend_from_slice(b"Inspection flight 42\0\0\0");
        let data = body(&raw);
        let mut reader = OdidReader::new(&data);
        let self_id = parse_self_id(&mut reader).unwrap();
        assert_eq!(self_id.description_type, 1);
        assert_eq!(self_id.description(), "Inspection flight 42");
        assert_eq!(reader.position(), layout::SELF_ID_LEN);
    }

    #[test]
    fn system_bitfields_and_integers() {
        let mut raw = vec![0b0000_1101];
        raw.extend_from_slice(&377_700_000i32.to_le_bytes());
        raw.extend_from_slice(&(-1_224_100_000i32).to_le_bytes());
        raw.extend_from_slice(&3u16.to_le_bytes());
        raw.push(10);
        raw.extend_from_slice(&2400u16.to_le_bytes());
        raw.extend_from_slice(&2000u16.to_le_bytes());
        raw.push(0x24);
        raw.extend_from_slice(&2050u16.to_le_bytes());
        raw.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        let data = body(&raw);

        let mut reader = OdidReader::new(&data);
        let system = parse_system(&mut reader).unwrap();
        assert_eq!(reader.position(), layout::SYSTEM_LEN);
        assert_eq!(system.operator_location_type, 1);
        assert_eq!(system.classification_type, 3);
        assert_eq!(system.area_count, 3);
        assert_eq!(system.area_radius, 10);
        assert_eq!(system.area_ceiling, 2400);
        assert_eq!(system.area_floor, 2000);
        assert_eq!(system.category, 2);
        assert_eq!(system.class_value, 4);
        assert_eq!(system.operator_altitude_geo, 2050);
        assert_eq!(system.system_timestamp, 0xDEAD_BEEF);
        assert!((system.operator_latitude_deg() - 37.77).abs() < 1e-9);
        assert_eq!(
            system.to_csv(),
            "1,3,377700000,-1224100000,3,10,2400,2000,2,4,2050,3735928559,"
        );
    }

    #[test]
    fn operator_id_reads_identifier() {
        let mut raw = vec![0x00];
        raw.extend_from_slice(b"FAA12345");
        let data = body(&raw);
        let mut reader = OdidReader::new(&data);
        let op = parse_operator_id(&mut reader).unwrap();
        assert_eq!(op.operator_id_type, 0);
        assert_eq!(op.operator_id(), "FAA12345");
        assert_eq!(op.to_csv(), "0,FAA12345,");
        assert_eq!(reader.position(), layout::OPERATOR_ID_LEN);
    }
}
