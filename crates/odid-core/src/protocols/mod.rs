//! Protocol decoding modules.
//!
//! The protocol follows a layered structure:
//! - `layout`: byte offsets, masks and scale factors (source of truth)
//! - `reader`: bounds-checked sequential byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation.

pub(crate) mod common;
pub mod odid;
