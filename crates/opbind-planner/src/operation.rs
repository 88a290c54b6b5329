//! Output of a surface-language call, consumed by the planner.

use std::any::Any;
use std::fmt;

use opbind_core::id::Kind;

pub trait OperationSpec: fmt::Debug + Send + Sync {
    /// Kind of the procedure this operation turns into.
    fn kind(&self) -> &Kind;

    fn as_any(&self) -> &dyn Any;
}
