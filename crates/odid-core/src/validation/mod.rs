//! Advisory plausibility checks over decoded payloads.
//!
//! Validation never alters or rejects decoded data: each check appends a
//! human-readable warning and an empty list means every check passed.
//! Only Location, Basic ID and Operator ID payloads are checked.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::protocols::odid::types::{horizontal_speed_mps, scaled_degrees, vertical_speed_mps};
use crate::protocols::odid::{BasicId, Location, Message, MessageType, OperatorId, Payload};

mod config;
mod error;

pub use config::ValidationConfig;
pub use error::ConfigError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const MAX_UA_TYPE: u8 = 15;

/// Great-circle distance in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn validate_location(location: &Location, config: &ValidationConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let distance = haversine_m(
        config.reference_lat,
        config.reference_lon,
        scaled_degrees(location.latitude),
        scaled_degrees(location.longitude),
    );
    if distance > config.max_distance_m {
        warnings.push(format!(
            "Drone is {distance:.2} meters away from reference location, which is suspicious."
        ));
    }

    let horizontal = horizontal_speed_mps(location.speed_mult, location.speed_horizontal);
    if horizontal > config.max_horizontal_speed_mps {
        warnings.push(format!(
            "Horizontal speed of {horizontal:.2} m/s is unusually high."
        ));
    }

    let vertical = vertical_speed_mps(location.speed_vertical);
    if vertical > config.max_vertical_speed_mps {
        warnings.push(format!("Vertical speed of {vertical:.2} m/s is unusually high."));
    }

    warnings
}

pub fn validate_basic_id(basic: &BasicId) -> Vec<String> {
    let mut warnings = Vec::new();
    if basic.ua_type > MAX_UA_TYPE {
        warnings.push(format!("UA Type {} is not valid.", basic.ua_type));
    }
    if basic.uas_id().trim().is_empty() {
        warnings.push("UAS ID is empty or invalid.".to_string());
    }
    warnings
}

pub fn validate_operator_id(operator: &OperatorId, config: &ValidationConfig) -> Vec<String> {
    let id = operator.operator_id();
    let id = id.trim();
    if config.is_allowed_operator(id) {
        Vec::new()
    } else {
        vec![format!("Operator ID is not in the allow list: {id}")]
    }
}

/// Run the checks that apply to `payload`; other kinds yield no warnings.
pub fn validate_payload(payload: &Payload, config: &ValidationConfig) -> Vec<String> {
    match payload {
        Payload::Location(location) => validate_location(location, config),
        Payload::BasicId(basic) => validate_basic_id(basic),
        Payload::OperatorId(operator) => validate_operator_id(operator, config),
        Payload::Auth(_)
        | Payload::SelfId(_)
        | Payload::System(_)
        | Payload::MessagePack(_) => Vec::new(),
    }
}

/// Warnings accumulated per payload kind, in kind order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Warnings {
    by_kind: BTreeMap<MessageType, Vec<String>>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `message` and record whatever it produced.
    pub fn check(&mut self, message: &Message, config: &ValidationConfig) -> usize {
        let found = validate_payload(&message.payload, config);
        let count = found.len();
        self.extend(message.kind(), found);
        count
    }

    pub fn extend(&mut self, kind: MessageType, warnings: Vec<String>) {
        if warnings.is_empty() {
            return;
        }
        self.by_kind.entry(kind).or_default().extend(warnings);
    }

    pub fn get(&self, kind: MessageType) -> &[String] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn total(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MessageType, &[String])> {
        self.by_kind
            .iter()
            .map(|(kind, warnings)| (*kind, warnings.as_slice()))
    }

    pub fn into_map(self) -> BTreeMap<MessageType, Vec<String>> {
        self.by_kind
    }
}
