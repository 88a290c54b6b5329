#![forbid(unsafe_code)]
//! opbind: bind dynamic operator calls into typed records and register each
//! operator with the function, plan, and execution stages in one call.
//!
//! The member crates are re-exported whole; the most common items are also
//! at the top level.

pub use opbind_core;
pub use opbind_decode;
pub use opbind_exec;
pub use opbind_function;
pub use opbind_planner;
pub use opbind_runtime;

pub use opbind_core::config::BindConfig;
pub use opbind_core::id::Kind;
pub use opbind_core::value::{StreamRef, Value};
pub use opbind_decode::{field, Arguments, DecodeError, Fields, Record};
pub use opbind_function::{register_transformation, seal_all, Registrar, TransformationSpec};
