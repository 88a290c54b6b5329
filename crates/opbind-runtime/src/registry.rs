//! `(package, name)` → function value.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use opbind_core::config::BindConfig;
use opbind_core::dag::CompileContext;
use opbind_core::registry::{Registry, RegistryError};
use opbind_core::value::{Function, Value};
use opbind_decode::Arguments;
use opbind_planner::OperationSpec;

use crate::error::CallError;
use crate::function::FunctionValue;

/// A member of a package, as the interpreter imports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageMember {
    pub package: String,
    pub name: String,
}

impl PackageMember {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

#[derive(Debug)]
pub struct FunctionRegistry {
    inner: Registry<PackageMember, Arc<FunctionValue>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::with_config(&BindConfig::default())
    }

    pub fn with_config(cfg: &BindConfig) -> Self {
        Self {
            inner: Registry::with_config("function", cfg),
        }
    }

    /// Install `function` under `package`; the member name is the
    /// function's own name.
    pub fn register(&self, package: &str, function: FunctionValue) -> Result<(), RegistryError> {
        let member = PackageMember::new(package, function.name());
        self.inner.register(member, Arc::new(function))
    }

    pub fn contains(&self, package: &str, name: &str) -> bool {
        self.inner.contains(&PackageMember::new(package, name))
    }

    pub fn get(&self, package: &str, name: &str) -> Option<Arc<FunctionValue>> {
        self.inner.get(&PackageMember::new(package, name))
    }

    /// The member as the interpreter sees it: a function value.
    pub fn package_value(&self, package: &str, name: &str) -> Option<Value> {
        self.get(package, name)
            .map(|f| Value::Function(Function::from_arc(f)))
    }

    pub fn call(
        &self,
        package: &str,
        name: &str,
        args: Arguments,
        ctx: &mut dyn CompileContext,
    ) -> Result<Box<dyn OperationSpec>, CallError> {
        let member = PackageMember::new(package, name);
        let function = self
            .inner
            .get(&member)
            .ok_or_else(|| CallError::UnknownFunction(member.clone()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(function = %member, args = args.len(), "calling");

        function
            .call(args, ctx)
            .map_err(|source| CallError::Bind {
                function: member.to_string(),
                source,
            })
    }

    /// Names registered under `package`, sorted.
    pub fn members(&self, package: &str) -> Vec<String> {
        self.inner
            .keys()
            .into_iter()
            .filter(|m| m.package == package)
            .map(|m| m.name)
            .collect()
    }

    pub fn seal(&self) {
        self.inner.seal();
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.is_sealed()
    }
}

/// Call a function value obtained from the interpreter.
pub fn call_value(
    value: &Value,
    args: Arguments,
    ctx: &mut dyn CompileContext,
) -> Result<Box<dyn OperationSpec>, CallError> {
    let Value::Function(function) = value else {
        return Err(CallError::NotCallable(value.value_type().to_string()));
    };
    let callable = function
        .downcast_ref::<FunctionValue>()
        .ok_or_else(|| CallError::NotCallable(function.name().to_string()))?;
    callable.call(args, ctx).map_err(|source| CallError::Bind {
        function: callable.name().to_string(),
        source,
    })
}

static FUNCTION_REGISTRY: Lazy<FunctionRegistry> =
    Lazy::new(|| FunctionRegistry::with_config(&BindConfig::from_env()));

/// The process-wide function-value registry.
pub fn global_function_registry() -> &'static FunctionRegistry {
    &FUNCTION_REGISTRY
}
