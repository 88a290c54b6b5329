#![forbid(unsafe_code)]
//! opbind-runtime: the interpreter-facing side of an operator.
//!
//! Operators become [`FunctionValue`]s stored under `(package, name)`. The
//! interpreter fetches them as ordinary [`Value::Function`]s and calls them
//! with an argument bag and the compile context of the current query.
//!
//! [`Value::Function`]: opbind_core::value::Value::Function

pub mod error;
pub mod function;
pub mod registry;

pub use error::CallError;
pub use function::{CallFn, FunctionValue, Signature};
pub use registry::{call_value, global_function_registry, FunctionRegistry, PackageMember};
