use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::source::{FrameEvent, FrameSource, SourceError};

use super::error::CaptureSourceError;
use super::layout;
use super::reader::decode_service_data;

/// Text capture of received service data, one frame per line:
/// `<timestamp_seconds|-> <device_id> <hex|base64>`.
pub struct CaptureFileSource<R = BufReader<File>> {
    lines: Lines<R>,
    line_no: usize,
}

impl CaptureFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> CaptureFileSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> FrameSource for CaptureFileSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        next_frame(self).map_err(SourceError::from)
    }
}

fn next_frame<R: BufRead>(
    source: &mut CaptureFileSource<R>,
) -> Result<Option<FrameEvent>, CaptureSourceError> {
    for line in source.lines.by_ref() {
        source.line_no += 1;
        let line = line?;
        if let Some(event) = parse_line(&line, source.line_no)? {
            return Ok(Some(event));
        }
    }
    Ok(None)
}

pub(crate) fn parse_line(line: &str, line_no: usize) -> Result<Option<FrameEvent>, CaptureSourceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(layout::COMMENT_PREFIX) {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() != layout::FIELD_COUNT {
        return Err(CaptureSourceError::Line {
            line: line_no,
            message: format!(
                "expected {} fields (timestamp, device, data), got {}",
                layout::FIELD_COUNT,
                fields.len()
            ),
        });
    }

    let ts = parse_timestamp(fields[0]).ok_or_else(|| CaptureSourceError::Line {
        line: line_no,
        message: format!("invalid timestamp '{}'", fields[0]),
    })?;
    let data = decode_service_data(fields[2]).map_err(|e| CaptureSourceError::Line {
        line: line_no,
        message: e.to_string(),
    })?;

    Ok(Some(FrameEvent {
        ts,
        device: fields[1].to_string(),
        data,
    }))
}

fn parse_timestamp(field: &str) -> Option<Option<f64>> {
    if field == layout::UNKNOWN_TIMESTAMP {
        return Some(None);
    }
    field
        .parse::<f64>()
        .ok()
        .filter(|ts| ts.is_finite() && *ts >= 0.0)
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::{CaptureFileSource, parse_line};
    use crate::source::capture::error::CaptureSourceError;
    use crate::source::{FrameSource, SourceError};
    use std::io::Cursor;

    #[test]
    fn parses_frame_line() {
        let event = parse_line("1700000000.25 drone-a 52ab", 1).unwrap().unwrap();
        assert_eq!(event.ts, Some(1_700_000_000.25));
        assert_eq!(event.device, "drone-a");
        assert_eq!(event.data, vec![0x52, 0xab]);
    }

    #[test]
    fn unknown_timestamp_is_none() {
        let event = parse_line("- drone-a 52", 1).unwrap().unwrap();
        assert_eq!(event.ts, None);
    }

    #[test]
    fn skips_comments_and_blanks() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("   # comment", 2).unwrap().is_none());
    }

    #[test]
    fn wrong_field_count_names_line() {
        let err = parse_line("1.0 drone-a", 7).unwrap_err();
        assert!(matches!(err, CaptureSourceError::Line { line: 7, .. }));
        assert!(err.to_string().starts_with("line 7:"));
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        assert!(parse_line("soon drone-a 52", 1).is_err());
        assert!(parse_line("-5 drone-a 52", 1).is_err());
    }

    #[test]
    fn source_yields_frames_in_order() {
        let text = "# capture\n1.0 a 52\n\n2.0 b 0x10\n";
        let mut source = CaptureFileSource::from_reader(Cursor::new(text));
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(first.device, "a");
        assert_eq!(second.device, "b");
        assert_eq!(second.data, vec![0x10]);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn source_reports_line_number() {
        let text = "1.0 a 52\n2.0 b\n";
        let mut source = CaptureFileSource::from_reader(Cursor::new(text));
        source.next_frame().unwrap();
        let err = source.next_frame().unwrap_err();
        assert!(matches!(err, SourceError::Parse { line: 2, .. }));
    }
}
