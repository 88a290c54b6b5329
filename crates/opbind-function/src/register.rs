//! Registration orchestrator.

use opbind_core::config::BindConfig;
use opbind_core::id::Kind;
use opbind_core::registry::RegistryError;
use opbind_exec::{global_exec_registry, ExecRegistry};
use opbind_planner::{global_plan_registry, OperationSpec, PlanRegistry};
use opbind_runtime::{global_function_registry, FunctionRegistry, FunctionValue, PackageMember, Signature};

use crate::binder::SpecFactory;
use crate::error::RegistrationError;
use crate::procedure::{create_transformation, new_procedure_spec};
use crate::transformation::TransformationSpec;

/// Installs operators into one set of function, plan, and execution
/// registries.
#[derive(Debug, Clone, Copy)]
pub struct Registrar<'a> {
    functions: &'a FunctionRegistry,
    plans: &'a PlanRegistry,
    execs: &'a ExecRegistry,
}

impl Registrar<'static> {
    /// The process-wide registries.
    pub fn global() -> Self {
        Self::new(
            global_function_registry(),
            global_plan_registry(),
            global_exec_registry(),
        )
    }
}

impl<'a> Registrar<'a> {
    pub fn new(
        functions: &'a FunctionRegistry,
        plans: &'a PlanRegistry,
        execs: &'a ExecRegistry,
    ) -> Self {
        Self {
            functions,
            plans,
            execs,
        }
    }

    /// Register `T` as `package.name`.
    ///
    /// Nothing is installed unless all three registries accept the kind.
    pub fn try_register<T: TransformationSpec>(
        &self,
        package: &str,
        name: &str,
        signature: impl Into<Signature>,
    ) -> Result<Kind, RegistrationError> {
        let kind = Kind::new(package, name);
        let factory = SpecFactory::<T>::new(kind.clone(), &BindConfig::from_env()).map_err(
            |source| RegistrationError::Shape {
                kind: kind.clone(),
                source,
            },
        )?;
        self.check_free(package, name, &kind)?;

        let function = FunctionValue::new(name, signature.into(), move |args, ctx| {
            let op = factory.create_op_spec(args, ctx)?;
            Ok(Box::new(op) as Box<dyn OperationSpec>)
        });
        self.functions.register(package, function)?;
        self.plans.register(kind.clone(), new_procedure_spec::<T>)?;
        self.execs.register(kind.clone(), create_transformation::<T>)?;

        #[cfg(feature = "tracing")]
        tracing::info!(kind = %kind, record = std::any::type_name::<T>(), "registered transformation");

        Ok(kind)
    }

    /// Like [`try_register`](Self::try_register), but a definition error
    /// aborts: it is a bug in the operator, not something to recover from.
    pub fn register<T: TransformationSpec>(
        &self,
        package: &str,
        name: &str,
        signature: impl Into<Signature>,
    ) -> Kind {
        match self.try_register::<T>(package, name, signature) {
            Ok(kind) => kind,
            Err(e) => panic!("operator registration failed: {e}"),
        }
    }

    /// Close all three registries for writes.
    pub fn seal_all(&self) {
        self.functions.seal();
        self.plans.seal();
        self.execs.seal();
    }

    fn check_free(&self, package: &str, name: &str, kind: &Kind) -> Result<(), RegistryError> {
        let member = PackageMember::new(package, name);
        let checks = [
            ("function", self.functions.is_sealed(), self.functions.contains(package, name), member.to_string()),
            ("plan", self.plans.is_sealed(), self.plans.contains(kind), kind.to_string()),
            ("execution", self.execs.is_sealed(), self.execs.contains(kind), kind.to_string()),
        ];
        for (registry, sealed, taken, key) in checks {
            if sealed {
                return Err(RegistryError::Sealed { registry, key });
            }
            if taken {
                return Err(RegistryError::Duplicate { registry, key });
            }
        }
        Ok(())
    }
}

/// Register `T` as `package.name` in the process-wide registries.
///
/// # Panics
///
/// If `T`'s shape is invalid, the kind is already registered, or the
/// registries were sealed.
pub fn register_transformation<T: TransformationSpec>(
    package: &str,
    name: &str,
    signature: impl Into<Signature>,
) -> Kind {
    Registrar::global().register::<T>(package, name, signature)
}

/// Close the process-wide registries once every operator is registered.
pub fn seal_all() {
    Registrar::global().seal_all();
}
