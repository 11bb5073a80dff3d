use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::odid::{Decoded, decode, is_valid_odid};
use crate::source::{
    CaptureFileSource, FrameEvent, FrameSource, SourceError, strip_transport_prefix,
};
use crate::validation::{ValidationConfig, Warnings};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, MessageRecord, Report, make_stub_report};

mod auth;
mod devices;

pub use auth::AuthAssembler;
use devices::{DeviceState, build_device_summaries};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_capture_file(path: &Path, config: &ValidationConfig) -> Result<Report, AnalysisError> {
    let source = CaptureFileSource::open(path)?;
    analyze_source(path, source, config)
}

pub fn analyze_source<S: FrameSource>(
    path: &Path,
    mut source: S,
    config: &ValidationConfig,
) -> Result<Report, AnalysisError> {
    let mut frames_total = 0u64;
    let mut frames_decoded = 0u64;
    let mut submessages_skipped = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut next_counter = 0u32;
    let mut devices: HashMap<String, DeviceState> = HashMap::new();
    let mut warnings = Warnings::new();
    let mut records = Vec::new();

    while let Some(FrameEvent { ts, device, data }) = source.next_frame()? {
        frames_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let payload = strip_transport_prefix(&data);
        let state = devices.entry(device.clone()).or_default();
        state.valid_source |= is_valid_odid(payload);

        let decoded = match decode(payload, 0, ts.unwrap_or(0.0), next_counter) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::debug!(device = %device, error = %err, "frame rejected");
                continue;
            }
        };
        next_counter = next_counter.wrapping_add(decoded.counters_used());
        if let Decoded::Pack(expansion) = &decoded {
            submessages_skipped += expansion.skipped.len() as u64;
        }
        if decoded.messages().is_empty() {
            tracing::debug!(device = %device, "frame rejected: every sub-message skipped");
            continue;
        }
        frames_decoded += 1;
        tracing::debug!(device = %device, messages = decoded.messages().len(), "frame decoded");

        let observed_at = ts_to_rfc3339(ts);
        for message in decoded.into_messages() {
            let found = warnings.check(&message, config);
            if found > 0 {
                tracing::debug!(device = %device, kind = %message.kind(), found, "validation warnings");
            }
            state.observe(&message, ts);
            records.push(MessageRecord {
                device: device.clone(),
                sequence_counter: message.sequence_counter,
                observed_at: observed_at.clone(),
                msg_type: message.kind(),
                version: message.header.version,
                csv: message.to_csv(),
            });
        }
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        frames_decoded,
        frames_rejected: frames_total - frames_decoded,
        messages_total: records.len() as u64,
        submessages_skipped,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.devices = build_device_summaries(devices);
    report.messages = records;
    report.warnings = warnings.into_map();

    tracing::debug!(frames_total, frames_decoded, "capture analysed");
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

pub(crate) fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{ts_to_rfc3339, update_ts_bounds};

    #[test]
    fn ts_bounds_track_min_and_max() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(5.0), None, Some(2.0), Some(9.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2.0));
        assert_eq!(last, Some(9.0));
    }

    #[test]
    fn rfc3339_formatting() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
