//! Callable function values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use opbind_core::dag::CompileContext;
use opbind_core::value::Callable;
use opbind_decode::{Arguments, DecodeError};
use opbind_planner::OperationSpec;

/// Type signature text handed to the type checker, e.g.
/// `(<-tables: stream[A], column: string) => stream[A]`. Opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signature {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

pub type CallFn = Arc<
    dyn Fn(Arguments, &mut dyn CompileContext) -> Result<Box<dyn OperationSpec>, DecodeError>
        + Send
        + Sync,
>;

#[derive(Clone)]
pub struct FunctionValue {
    name: String,
    signature: Signature,
    call: CallFn,
}

impl FunctionValue {
    pub fn new<F>(name: impl Into<String>, signature: Signature, call: F) -> Self
    where
        F: Fn(Arguments, &mut dyn CompileContext) -> Result<Box<dyn OperationSpec>, DecodeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            signature,
            call: Arc::new(call),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Bind `args` for one invocation. Parent edges go to `ctx`.
    pub fn call(
        &self,
        args: Arguments,
        ctx: &mut dyn CompileContext,
    ) -> Result<Box<dyn OperationSpec>, DecodeError> {
        (self.call)(args, ctx)
    }
}

impl Callable for FunctionValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
