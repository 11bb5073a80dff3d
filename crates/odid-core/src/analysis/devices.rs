use std::collections::HashMap;

use crate::protocols::odid::{BasicId, Location, Message, Payload};
use crate::{BasicIdSummary, DeviceSummary, LocationFix};

use super::auth::AuthAssembler;
use super::ts_to_rfc3339;

/// Latest payload of each kind seen from one device; later messages win.
#[derive(Debug, Default)]
pub(crate) struct DeviceState {
    pub valid_source: bool,
    pub messages_total: u64,
    basic_id: Option<BasicId>,
    location: Option<(Location, Option<f64>)>,
    operator_id: Option<String>,
    self_id: Option<String>,
    auth: AuthAssembler,
}

impl DeviceState {
    pub(crate) fn observe(&mut self, message: &Message, ts: Option<f64>) {
        self.messages_total += 1;
        match &message.payload {
            Payload::BasicId(basic) => self.basic_id = Some(basic.clone()),
            Payload::Location(location) => self.location = Some((location.clone(), ts)),
            Payload::OperatorId(operator) => self.operator_id = Some(operator.operator_id()),
            Payload::SelfId(self_id) => self.self_id = Some(self_id.description()),
            Payload::Auth(page) => self.auth.push(page),
            Payload::System(_) | Payload::MessagePack(_) => {}
        }
    }
}

pub(crate) fn build_device_summaries(devices: HashMap<String, DeviceState>) -> Vec<DeviceSummary> {
    let mut summaries: Vec<DeviceSummary> = devices
        .into_iter()
        .map(|(device, state)| DeviceSummary {
            device,
            valid_source: state.valid_source,
            messages_total: state.messages_total,
            basic_id: state.basic_id.as_ref().map(|basic| BasicIdSummary {
                id_type: basic.id_type,
                ua_type: basic.ua_type,
                ua_type_description: basic.ua_type_description().map(str::to_string),
                uas_id: basic.uas_id(),
            }),
            location: state
                .location
                .as_ref()
                .map(|(location, ts)| LocationFix {
                    latitude_deg: location.latitude_deg(),
                    longitude_deg: location.longitude_deg(),
                    altitude_m: location.altitude_m(),
                    horizontal_speed_mps: location.horizontal_speed_mps(),
                    vertical_speed_mps: location.vertical_speed_mps(),
                    observed_at: ts_to_rfc3339(*ts),
                }),
            operator_id: state.operator_id,
            self_id: state.self_id,
            authentication: (!state.auth.is_empty()).then(|| state.auth.summary()),
        })
        .collect();

    summaries.sort_by(|a, b| a.device.cmp(&b.device));
    summaries
}

#[cfg(test)]
mod tests {
    use super::{DeviceState, build_device_summaries};
    use crate::protocols::odid::decode_messages;
    use std::collections::HashMap;

    fn operator_frame(id: &[u8]) -> Vec<u8> {
        let mut data = vec![0x52, 0x00];
        data.extend_from_slice(id);
        data.resize(25, 0);
        data
    }

    #[test]
    fn later_messages_override_earlier() {
        let mut state = DeviceState::default();
        for message in decode_messages(&operator_frame(b"FAA12345"), 0, 1.0, 0) {
            state.observe(&message, Some(1.0));
        }
        for message in decode_messages(&operator_frame(b"DOD98765"), 0, 2.0, 1) {
            state.observe(&message, Some(2.0));
        }
        state.valid_source = true;

        let mut devices = HashMap::new();
        devices.insert("b".to_string(), DeviceState::default());
        devices.insert("a".to_string(), state);
        let summaries = build_device_summaries(devices);

        assert_eq!(summaries[0].device, "a");
        assert_eq!(summaries[0].messages_total, 2);
        assert_eq!(summaries[0].operator_id.as_deref(), Some("DOD98765"));
        assert!(summaries[0].authentication.is_none());
        assert_eq!(summaries[1].device, "b");
        assert!(!summaries[1].valid_source);
    }
}
