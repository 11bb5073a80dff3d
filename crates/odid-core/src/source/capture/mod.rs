//! Text capture source.
//!
//! Captures are produced by whatever scanner received the broadcast; this
//! module only handles file I/O and line parsing, emitting raw service-data
//! bytes for the analysis pipeline.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::CaptureFileSource;
