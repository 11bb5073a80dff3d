//! Decoded payload records.
//!
//! Every record keeps the raw integer fields exactly as broadcast; derived
//! values (degrees, metres, metres per second) are computed on demand so the
//! raw data is never lossy. `to_csv` renders the raw fields in wire order,
//! comma-delimited with a trailing delimiter.

use std::fmt::Display;
use std::ops::Range;

use serde::{Serialize, Serializer};

use super::header::{Header, MessageType};
use super::layout;
use crate::protocols::common::padded_ascii;

/// Descriptions for the 4-bit UA type in Basic ID messages.
pub const UA_TYPE_DESCRIPTIONS: [&str; 16] = [
    "No UA type defined",
    "Aeroplane/Airplane (Fixed wing)",
    "Helicopter or Multirotor",
    "Gyroplane",
    "VTOL (Vertical Take-Off and Landing)",
    "Ornithopter",
    "Glider",
    "Kite",
    "Free Balloon",
    "Captive Balloon",
    "Airship (Blimp)",
    "Free Fall/Parachute",
    "Rocket",
    "Tethered powered aircraft",
    "Ground Obstacle",
    "Other type",
];

pub fn ua_type_description(ua_type: u8) -> Option<&'static str> {
    UA_TYPE_DESCRIPTIONS.get(ua_type as usize).copied()
}

/// Horizontal speed in m/s from the raw byte and the multiplier flag.
///
/// The flag selects between 0.25 m/s steps (0..=63.75) and 0.75 m/s steps
/// offset by 63.75, covering up to 254.25 m/s.
pub fn horizontal_speed_mps(speed_mult: u8, raw: u8) -> f64 {
    if speed_mult == 0 {
        raw as f64 * layout::SPEED_SCALE_LOW
    } else {
        raw as f64 * layout::SPEED_SCALE_HIGH + layout::SPEED_HIGH_OFFSET
    }
}

pub fn vertical_speed_mps(raw: u8) -> f64 {
    raw as f64 * layout::VERTICAL_SPEED_SCALE
}

pub fn scaled_degrees(raw: i32) -> f64 {
    raw as f64 * layout::LAT_LON_SCALE
}

pub fn altitude_m(raw: u16) -> f64 {
    raw as f64 * layout::ALTITUDE_SCALE - layout::ALTITUDE_OFFSET_M
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicId {
    pub id_type: u8,
    pub ua_type: u8,
    #[serde(serialize_with = "serialize_text")]
    pub uas_id: [u8; layout::MAX_ID_BYTE_SIZE],
}

impl BasicId {
    pub fn uas_id(&self) -> String {
        padded_ascii(&self.uas_id)
    }

    pub fn ua_type_description(&self) -> Option<&'static str> {
        ua_type_description(self.ua_type)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[&self.id_type, &self.ua_type, &self.uas_id()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub status: u8,
    pub height_type: u8,
    pub ew_direction: u8,
    pub speed_mult: u8,
    pub direction: u8,
    pub speed_horizontal: u8,
    pub speed_vertical: u8,
    pub latitude: i32,
    pub longitude: i32,
    pub altitude_pressure: u16,
    pub altitude_geodetic: u16,
    pub height: u16,
    pub horizontal_accuracy: u8,
    pub vertical_accuracy: u8,
    pub baro_accuracy: u8,
    pub speed_accuracy: u8,
    pub timestamp: u16,
    pub time_accuracy: u8,
    /// Reserved for a receiver-relative distance; never filled by decoding.
    pub distance: u32,
}

impl Location {
    pub fn latitude_deg(&self) -> f64 {
        scaled_degrees(self.latitude)
    }

    pub fn longitude_deg(&self) -> f64 {
        scaled_degrees(self.longitude)
    }

    pub fn altitude_m(&self) -> f64 {
        altitude_m(self.height)
    }

    pub fn horizontal_speed_mps(&self) -> f64 {
        horizontal_speed_mps(self.speed_mult, self.speed_horizontal)
    }

    pub fn vertical_speed_mps(&self) -> f64 {
        vertical_speed_mps(self.speed_vertical)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[
            &self.status,
            &self.height_type,
            &self.ew_direction,
            &self.speed_mult,
            &self.direction,
            &self.speed_horizontal,
            &self.speed_vertical,
            &self.latitude,
            &self.longitude,
            &self.altitude_pressure,
            &self.altitude_geodetic,
            &self.height,
            &self.horizontal_accuracy,
            &self.vertical_accuracy,
            &self.baro_accuracy,
            &self.speed_accuracy,
            &self.timestamp,
            &self.time_accuracy,
            &self.distance,
        ])
    }
}

/// Fields only carried by authentication page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthMetadata {
    pub last_page_index: u8,
    pub length: u8,
    pub timestamp: u32,
}

/// One authentication page placed into the 362-byte aggregate buffer.
///
/// Only the bytes of `page_index` are populated; merging pages across
/// messages is left to the caller (see `analysis::auth`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Authentication {
    pub auth_type: u8,
    pub page_index: u8,
    pub metadata: Option<AuthMetadata>,
    #[serde(serialize_with = "serialize_hex")]
    pub data: [u8; layout::MAX_AUTH_DATA],
}

impl Authentication {
    /// Byte range of the aggregate buffer covered by `page_index`.
    pub fn page_range(page_index: u8) -> Range<usize> {
        if page_index == 0 {
            0..layout::AUTH_PAGE_ZERO_SIZE
        } else {
            let start = layout::AUTH_PAGE_ZERO_SIZE
                + (page_index as usize - 1) * layout::AUTH_PAGE_NON_ZERO_SIZE;
            start..start + layout::AUTH_PAGE_NON_ZERO_SIZE
        }
    }

    pub fn page_bytes(&self) -> &[u8] {
        &self.data[Self::page_range(self.page_index)]
    }

    pub fn to_csv(&self) -> String {
        let meta = self.metadata.unwrap_or(AuthMetadata {
            last_page_index: 0,
            length: 0,
            timestamp: 0,
        });
        csv_line(&[
            &self.auth_type,
            &self.page_index,
            &meta.last_page_index,
            &meta.length,
            &meta.timestamp,
            &hex::encode(self.data),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfId {
    pub description_type: u8,
    #[serde(serialize_with = "serialize_text")]
    pub description: [u8; layout::MAX_STRING_BYTE_SIZE],
}

impl SelfId {
    pub fn description(&self) -> String {
        padded_ascii(&self.description)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[&self.description_type, &self.description()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMsg {
    pub operator_location_type: u8,
    pub classification_type: u8,
    pub operator_latitude: i32,
    pub operator_longitude: i32,
    pub area_count: u16,
    pub area_radius: u8,
    pub area_ceiling: u16,
    pub area_floor: u16,
    pub category: u8,
    pub class_value: u8,
    pub operator_altitude_geo: u16,
    pub system_timestamp: u32,
}

impl SystemMsg {
    pub fn operator_latitude_deg(&self) -> f64 {
        scaled_degrees(self.operator_latitude)
    }

    pub fn operator_longitude_deg(&self) -> f64 {
        scaled_degrees(self.operator_longitude)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[
            &self.operator_location_type,
            &self.classification_type,
            &self.operator_latitude,
            &self.operator_longitude,
            &self.area_count,
            &self.area_radius,
            &self.area_ceiling,
            &self.area_floor,
            &self.category,
            &self.class_value,
            &self.operator_altitude_geo,
            &self.system_timestamp,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorId {
    pub operator_id_type: u8,
    #[serde(serialize_with = "serialize_text")]
    pub operator_id: [u8; layout::MAX_ID_BYTE_SIZE],
}

impl OperatorId {
    pub fn operator_id(&self) -> String {
        padded_ascii(&self.operator_id)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[&self.operator_id_type, &self.operator_id()])
    }
}

/// Container of `messages_in_pack` concatenated single messages, unexpanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePack {
    pub message_size: u8,
    pub messages_in_pack: u8,
    #[serde(serialize_with = "serialize_hex")]
    pub messages: Vec<u8>,
}

impl MessagePack {
    pub fn sub_messages(&self) -> impl Iterator<Item = &[u8]> {
        self.messages.chunks_exact(self.message_size.max(1) as usize)
    }

    pub fn to_csv(&self) -> String {
        csv_line(&[&self.message_size, &self.messages_in_pack])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    BasicId(BasicId),
    Location(Location),
    Auth(Authentication),
    SelfId(SelfId),
    System(SystemMsg),
    OperatorId(OperatorId),
    MessagePack(MessagePack),
}

impl Payload {
    pub fn kind(&self) -> MessageType {
        match self {
            Payload::BasicId(_) => MessageType::BasicId,
            Payload::Location(_) => MessageType::Location,
            Payload::Auth(_) => MessageType::Auth,
            Payload::SelfId(_) => MessageType::SelfId,
            Payload::System(_) => MessageType::System,
            Payload::OperatorId(_) => MessageType::OperatorId,
            Payload::MessagePack(_) => MessageType::MessagePack,
        }
    }

    pub fn to_csv(&self) -> String {
        match self {
            Payload::BasicId(p) => p.to_csv(),
            Payload::Location(p) => p.to_csv(),
            Payload::Auth(p) => p.to_csv(),
            Payload::SelfId(p) => p.to_csv(),
            Payload::System(p) => p.to_csv(),
            Payload::OperatorId(p) => p.to_csv(),
            Payload::MessagePack(p) => p.to_csv(),
        }
    }
}

/// One decoded message. Immutable once built; ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub sequence_counter: u32,
    /// Capture time in seconds since the Unix epoch, as supplied by the caller.
    pub observed_at: f64,
    pub header: Header,
    pub payload: Payload,
}

impl Message {
    pub fn kind(&self) -> MessageType {
        self.payload.kind()
    }

    pub fn to_csv(&self) -> String {
        self.payload.to_csv()
    }
}

fn csv_line(fields: &[&dyn Display]) -> String {
    let mut line = String::new();
    for field in fields {
        line.push_str(&field.to_string());
        line.push(layout::DELIM);
    }
    line
}

fn serialize_text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&padded_ascii(bytes))
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
