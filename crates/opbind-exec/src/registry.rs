//! Kind → transformation constructor.

use std::sync::Arc;

use once_cell::sync::Lazy;

use opbind_core::config::BindConfig;
use opbind_core::id::Kind;
use opbind_core::registry::{Registry, RegistryError};
use opbind_planner::procedure::ProcedureSpec;

use crate::error::ExecError;
use crate::transformation::{Administration, Dataset, DatasetId, Transformation};

pub type CreateTransformation = Arc<
    dyn Fn(
            DatasetId,
            &dyn Administration,
            &dyn ProcedureSpec,
        ) -> Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError>
        + Send
        + Sync,
>;

#[derive(Debug)]
pub struct ExecRegistry {
    inner: Registry<Kind, CreateTransformation>,
}

impl Default for ExecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecRegistry {
    pub fn new() -> Self {
        Self::with_config(&BindConfig::default())
    }

    pub fn with_config(cfg: &BindConfig) -> Self {
        Self {
            inner: Registry::with_config("execution", cfg),
        }
    }

    pub fn register<F>(&self, kind: Kind, create: F) -> Result<(), RegistryError>
    where
        F: Fn(
                DatasetId,
                &dyn Administration,
                &dyn ProcedureSpec,
            ) -> Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError>
            + Send
            + Sync
            + 'static,
    {
        self.inner.register(kind, Arc::new(create))
    }

    pub fn contains(&self, kind: &Kind) -> bool {
        self.inner.contains(kind)
    }

    pub fn get(&self, kind: &Kind) -> Option<CreateTransformation> {
        self.inner.get(kind)
    }

    /// Build the runnable pair for `spec`, dispatching on `spec.kind()`.
    pub fn create_transformation(
        &self,
        id: DatasetId,
        admin: &dyn Administration,
        spec: &dyn ProcedureSpec,
    ) -> Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError> {
        let create = self
            .get(spec.kind())
            .ok_or_else(|| ExecError::UnknownKind(spec.kind().clone()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %spec.kind(), dataset = %id, "creating transformation");

        create(id, admin, spec)
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

static EXEC_REGISTRY: Lazy<ExecRegistry> =
    Lazy::new(|| ExecRegistry::with_config(&BindConfig::from_env()));

/// The process-wide execution registry.
pub fn global_exec_registry() -> &'static ExecRegistry {
    &EXEC_REGISTRY
}
