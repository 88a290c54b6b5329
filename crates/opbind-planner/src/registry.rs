//! Kind → procedure-spec constructor.

use std::sync::Arc;

use once_cell::sync::Lazy;

use opbind_core::config::BindConfig;
use opbind_core::id::Kind;
use opbind_core::registry::{Registry, RegistryError};

use crate::error::PlanError;
use crate::operation::OperationSpec;
use crate::procedure::ProcedureSpec;

pub type CreateProcedureSpec =
    Arc<dyn Fn(&dyn OperationSpec) -> Result<Box<dyn ProcedureSpec>, PlanError> + Send + Sync>;

#[derive(Debug)]
pub struct PlanRegistry {
    inner: Registry<Kind, CreateProcedureSpec>,
}

impl Default for PlanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::with_config(&BindConfig::default())
    }

    pub fn with_config(cfg: &BindConfig) -> Self {
        Self {
            inner: Registry::with_config("plan", cfg),
        }
    }

    pub fn register<F>(&self, kind: Kind, create: F) -> Result<(), RegistryError>
    where
        F: Fn(&dyn OperationSpec) -> Result<Box<dyn ProcedureSpec>, PlanError>
            + Send
            + Sync
            + 'static,
    {
        self.inner.register(kind, Arc::new(create))
    }

    pub fn contains(&self, kind: &Kind) -> bool {
        self.inner.contains(kind)
    }

    pub fn get(&self, kind: &Kind) -> Option<CreateProcedureSpec> {
        self.inner.get(kind)
    }

    /// Look up the constructor for `op.kind()` and run it.
    pub fn create_procedure_spec(
        &self,
        op: &dyn OperationSpec,
    ) -> Result<Box<dyn ProcedureSpec>, PlanError> {
        let create = self
            .get(op.kind())
            .ok_or_else(|| PlanError::UnknownKind(op.kind().clone()))?;
        create(op)
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.inner.keys()
    }

    pub fn seal(&self) {
        self.inner.seal();
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.is_sealed()
    }
}

static PLAN_REGISTRY: Lazy<PlanRegistry> =
    Lazy::new(|| PlanRegistry::with_config(&BindConfig::from_env()));

/// The process-wide plan registry.
pub fn global_plan_registry() -> &'static PlanRegistry {
    &PLAN_REGISTRY
}
