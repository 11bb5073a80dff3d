//! Open Drone ID decoding core.
//!
//! This crate turns broadcast remote-identification service data into typed
//! messages and runs advisory plausibility checks over them. Decoding is
//! byte-oriented and side-effect free: each call is a pure function of the
//! bytes it is given, and protocol conventions live in `layout`/`reader`
//! modules so parsers stay minimal. The offline analysis layer plays the
//! collector role on top: it reads a text capture, accumulates per-device
//! state (including authentication page merging) and emits a deterministic
//! report.
//!
//! Invariants:
//! - A single message is exactly 25 bytes; shorter buffers never decode.
//! - Message packs are validated as a whole before any sub-message is read.
//! - Pack sub-messages carry consecutive sequence counters in pack order.
//! - Validation findings are advisory and never change decoded data.
//!
//! # Examples
//! ```
//! use odid_core::{Payload, ValidationConfig, decode, validate_payload};
//!
//! let mut frame = vec![0x12, 0x20, 0x5a, 40, 4];
//! frame.extend_from_slice(&377_749_000i32.to_le_bytes());
//! frame.extend_from_slice(&(-1_224_194_000i32).to_le_bytes());
//! frame.resize(25, 0);
//!
//! let decoded = decode(&frame, 0, 0.0, 0)?;
//! let message = &decoded.messages()[0];
//! let Payload::Location(location) = &message.payload else { unreachable!() };
//! assert!((location.latitude_deg() - 37.7749).abs() < 1e-9);
//! assert!(validate_payload(&message.payload, &ValidationConfig::default()).is_empty());
//! # Ok::<(), odid_core::OdidError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod analysis;
mod protocols;
mod source;
mod validation;

pub use analysis::{AnalysisError, AuthAssembler, analyze_capture_file, analyze_source};
pub use protocols::odid::{
    AuthMetadata, Authentication, BasicId, Decoded, Header, Location, Message, MessagePack,
    MessageType, OdidError, OperatorId, PackExpansion, Payload, SelfId, SkippedSubMessage,
    SystemMsg, decode, decode_message, decode_messages, is_valid_odid, parse_header,
    ua_type_description,
};
pub use protocols::odid::layout::{MAX_AUTH_DATA, MAX_MESSAGES_IN_PACK, MESSAGE_SIZE};
pub use source::{
    CaptureFileSource, FrameEvent, FrameSource, ServiceDataError, SourceError,
    decode_service_data, is_valid_odid_service_data, strip_transport_prefix,
};
pub use validation::{
    ConfigError, ValidationConfig, Warnings, haversine_m, validate_basic_id, validate_location,
    validate_operator_id, validate_payload,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use odid_core::make_stub_report;
///
/// let report = make_stub_report("capture.txt", 123);
/// assert_eq!(report.report_version, odid_core::REPORT_VERSION);
/// assert!(report.messages.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Capture summary (absent on stub reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per-device summaries sorted by device id.
    pub devices: Vec<DeviceSummary>,
    /// Decoded messages in decode order, packs expanded in place.
    pub messages: Vec<MessageRecord>,
    /// Advisory warnings keyed by payload kind.
    pub warnings: BTreeMap<MessageType, Vec<String>>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Frame and message counts for the whole capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub frames_total: u64,
    /// Frames that produced at least one message.
    pub frames_decoded: u64,
    /// Frames that produced no message, including packs whose every sub-message was skipped.
    pub frames_rejected: u64,
    pub messages_total: u64,
    /// Pack sub-messages dropped while the rest of their pack was kept.
    pub submessages_skipped: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Latest known state of one transmitting device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device: String,
    /// At least one frame from this device carried a recognizable header.
    pub valid_source: bool,
    pub messages_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_id: Option<BasicIdSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationFix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicIdSummary {
    pub id_type: u8,
    pub ua_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua_type_description: Option<String>,
    pub uas_id: String,
}

/// Derived position and speeds from the latest Location message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    pub horizontal_speed_mps: f64,
    pub vertical_speed_mps: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
}

/// Authentication pages merged across messages from one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSummary {
    pub auth_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u32>,
    pub pages_seen: Vec<u8>,
    pub complete: bool,
    /// Merged data, hex encoded, up to the last page known so far.
    pub data_hex: String,
}

/// One decoded message as exported in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub device: String,
    pub sequence_counter: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
    pub msg_type: MessageType,
    pub version: u8,
    /// Comma-delimited raw fields with trailing delimiter.
    pub csv: String,
}

/// Build a stub report with base fields filled and empty aggregates.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "odid".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        devices: vec![],
        messages: vec![],
        warnings: BTreeMap::new(),
    }
}
