#![forbid(unsafe_code)]
//! opbind-core: the vocabulary shared by every compiler stage.
//!
//! - `value`: the dynamic values produced by the interpreter.
//! - `schema`: explicit record shapes the decoder is driven by.
//! - `dag`: the compile context and per-query dependency graph.
//! - `registry`: append-only, sealable registries keyed by `Kind`.
//!
//! No I/O and no async here.

pub mod config;
pub mod dag;
pub mod error;
pub mod id;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
