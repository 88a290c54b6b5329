#![forbid(unsafe_code)]
//! opbind-decode: dynamic argument bag → statically-shaped record.
//!
//! The decoder is driven by an explicit `RecordShape` (see `opbind-core`):
//! - every bound field is looked up by its argument name and tag-checked,
//! - stream references in stream fields are collected as parent edges,
//! - any argument the shape did not consume is an error.
//!
//! `Record` and `FieldType` connect a shape to a concrete Rust struct so the
//! decoded `Fields` can be moved into typed fields without run-time type
//! discovery.

pub mod args;
pub mod decode;
pub mod error;
pub mod fields;
pub mod record;

pub use args::Arguments;
pub use decode::{decode_record, DecodedRecord, Decoder};
pub use error::{DecodeError, Result};
pub use fields::{Decoded, Fields};
pub use record::{field, FieldType, Nested, Record};
