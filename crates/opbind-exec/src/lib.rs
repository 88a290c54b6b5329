#![forbid(unsafe_code)]
//! opbind-exec: what the physical layer exposes to operator authors.
//!
//! The push-based scheduler lives elsewhere. This crate only carries the
//! capability traits it drives (`Transformation`, `Dataset`,
//! `Administration`) and the execution registry that turns a procedure spec
//! into a runnable pair.

pub mod error;
pub mod registry;
pub mod transformation;

pub use error::ExecError;
pub use registry::{global_exec_registry, CreateTransformation, ExecRegistry};
pub use transformation::{Administration, Dataset, DatasetId, ParentSet, Transformation};
