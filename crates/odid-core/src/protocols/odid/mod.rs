//! Open Drone ID (ASTM F3411 broadcast) message decoding.
//!
//! A single message is 25 bytes: a header byte (type in the high nibble,
//! protocol version in the low nibble) followed by a type-specific body.
//! Message packs (type 0xF) wrap up to nine single messages behind a 3-byte
//! framing header and are expanded one level by the assembler.
//!
//! Byte positions and scale factors live in `layout`, bounds-checked
//! sequential reads in `reader`, per-type body decoding in `parser` and
//! `pack`, and dispatch in `assembler`. Decoding is pure: no state survives
//! between calls and diagnostics are returned or emitted as `tracing`
//! events.

pub mod assembler;
pub mod error;
pub mod header;
pub mod layout;
pub mod pack;
pub mod parser;
pub mod reader;
pub mod types;

pub use assembler::{Decoded, PackExpansion, SkippedSubMessage, decode, decode_message, decode_messages};
pub use error::OdidError;
pub use header::{Header, MessageType, is_valid_odid, parse_header};
pub use types::{
    AuthMetadata, Authentication, BasicId, Location, Message, MessagePack, OperatorId, Payload,
    SelfId, SystemMsg, ua_type_description,
};
