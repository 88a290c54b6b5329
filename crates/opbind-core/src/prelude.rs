//! Convenient re-exports for downstream crates.

pub use crate::config::BindConfig;
pub use crate::dag::{Administration, CompileContext, OperationNode, QueryGraph};
pub use crate::error::{Error, Result};
pub use crate::id::{Kind, OpId};
pub use crate::registry::{Registry, RegistryError};
pub use crate::schema::{FieldKind, FieldSpec, RecordShape, ScalarKind, ShapeError};
pub use crate::value::{Callable, Duration, Function, Object, StreamRef, Time, Value, ValueType};
