//! Once sealed, the process-wide registries refuse registrations but keep
//! serving lookups. Lives in its own test binary: sealing is global.

use opbind::opbind_core::registry::RegistryError;
use opbind::opbind_core::schema::RecordShape;
use opbind::opbind_decode::Result;
use opbind::opbind_exec::{self as exec, DatasetId, ExecError, Transformation};
use opbind::opbind_function::RegistrationError;
use opbind::opbind_planner::global_plan_registry;
use opbind::opbind_runtime::global_function_registry;
use opbind::{field, register_transformation, seal_all, Fields, Kind, Record, Registrar, TransformationSpec};

#[derive(Debug, Clone)]
struct Limit {
    n: i64,
}

impl Record for Limit {
    fn shape() -> RecordShape {
        RecordShape::new("Limit").with(field::<i64>("N"))
    }

    fn from_fields(f: &mut Fields) -> Result<Self> {
        Ok(Self { n: f.take("n")? })
    }
}

impl TransformationSpec for Limit {
    fn create_transformation(
        &self,
        _id: DatasetId,
        _admin: &dyn exec::Administration,
    ) -> std::result::Result<(Box<dyn Transformation>, Box<dyn exec::Dataset>), ExecError> {
        Err(ExecError::Transformation(format!("limit {}", self.n)))
    }
}

#[test]
fn sealed_registries_are_read_only() {
    let kind = register_transformation::<Limit>("testing/seal", "limit", "(n: int) => stream[A]");
    seal_all();

    let err = Registrar::global()
        .try_register::<Limit>("testing/seal", "tail", "(n: int) => stream[A]")
        .unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::Registry(RegistryError::Sealed { .. })
    ));

    assert!(global_plan_registry().is_sealed());
    assert!(global_plan_registry().get(&kind).is_some());
    assert!(global_plan_registry().get(&Kind::new("testing/seal", "tail")).is_none());
    assert!(global_function_registry().contains("testing/seal", "limit"));
    assert!(!global_function_registry().contains("testing/seal", "tail"));
}
