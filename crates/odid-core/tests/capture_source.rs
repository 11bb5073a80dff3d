use std::path::PathBuf;

use odid_core::{CaptureFileSource, FrameSource, SourceError, strip_transport_prefix};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn capture_source_reads_frames_from_fixture() {
    let mut source = CaptureFileSource::open(&fixture("capture_clean.txt")).unwrap();

    let mut frames = Vec::new();
    while let Some(event) = source.next_frame().unwrap() {
        frames.push(event);
    }

    assert_eq!(frames.len(), 8);
    assert_eq!(frames[0].device, "drone-a");
    assert_eq!(frames[0].ts, Some(1_700_000_000.0));
    assert_eq!(frames[0].data.len(), 25);
    // base64 line
    assert_eq!(frames[2].data[0], 0x52);
    assert_eq!(frames[3].data.len(), 55);
    assert_eq!(strip_transport_prefix(&frames[3].data)[0], 0xF2);
}

#[test]
fn capture_source_reports_malformed_line() {
    let mut source = CaptureFileSource::open(&fixture("capture_malformed.txt")).unwrap();
    assert!(source.next_frame().unwrap().is_some());
    let err = source.next_frame().unwrap_err();
    assert!(matches!(err, SourceError::Parse { line: 3, .. }));
}

#[test]
fn capture_source_rejects_missing_file() {
    let err = match CaptureFileSource::open(&fixture("does_not_exist.txt")) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
