//! Operation and procedure wrappers around a `TransformationSpec`, plus the
//! adapters installed in the plan and execution registries.

use std::any::{self, Any};

use opbind_core::id::Kind;
use opbind_exec::{Administration, Dataset, DatasetId, ExecError, Transformation};
use opbind_planner::{OperationSpec, PlanError, ProcedureSpec};

use crate::transformation::TransformationSpec;

/// What a bound call hands to the planner.
#[derive(Debug, Clone)]
pub struct Operation<T> {
    procedure: Procedure<T>,
}

impl<T> Operation<T> {
    pub fn new(kind: Kind, spec: T) -> Self {
        Self {
            procedure: Procedure { kind, spec },
        }
    }

    pub fn spec(&self) -> &T {
        &self.procedure.spec
    }

    pub fn procedure(&self) -> &Procedure<T> {
        &self.procedure
    }

    pub fn into_procedure(self) -> Procedure<T> {
        self.procedure
    }
}

impl<T: TransformationSpec> OperationSpec for Operation<T> {
    fn kind(&self) -> &Kind {
        &self.procedure.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Plan node owning its record by value.
#[derive(Debug, Clone)]
pub struct Procedure<T> {
    kind: Kind,
    spec: T,
}

impl<T> Procedure<T> {
    pub fn spec(&self) -> &T {
        &self.spec
    }

    /// For rewrite passes. Other copies of this node are unaffected.
    pub fn spec_mut(&mut self) -> &mut T {
        &mut self.spec
    }
}

impl<T: TransformationSpec> ProcedureSpec for Procedure<T> {
    fn kind(&self) -> &Kind {
        &self.kind
    }

    fn copy(&self) -> Box<dyn ProcedureSpec> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Plan-registry adapter: `Operation<T>` ⇒ `Procedure<T>`.
pub fn new_procedure_spec<T: TransformationSpec>(
    op: &dyn OperationSpec,
) -> Result<Box<dyn ProcedureSpec>, PlanError> {
    let op = op
        .as_any()
        .downcast_ref::<Operation<T>>()
        .ok_or_else(|| PlanError::InvalidSpec {
            kind: op.kind().clone(),
            expected: any::type_name::<Operation<T>>(),
        })?;
    Ok(Box::new(op.procedure().clone()))
}

/// Execution-registry adapter: forwards to `T::create_transformation`.
pub fn create_transformation<T: TransformationSpec>(
    id: DatasetId,
    admin: &dyn Administration,
    spec: &dyn ProcedureSpec,
) -> Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError> {
    let procedure = spec
        .as_any()
        .downcast_ref::<Procedure<T>>()
        .ok_or_else(|| ExecError::InvalidSpec {
            kind: spec.kind().clone(),
            expected: any::type_name::<Procedure<T>>(),
        })?;
    procedure.spec.create_transformation(id, admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opbind_core::schema::RecordShape;
    use opbind_decode::{field, Fields, Record, Result};

    #[derive(Debug, Clone, PartialEq)]
    struct Keep {
        columns: Vec<String>,
    }

    impl Record for Keep {
        fn shape() -> RecordShape {
            RecordShape::new("Keep").with(field::<Vec<String>>("Columns"))
        }

        fn from_fields(f: &mut Fields) -> Result<Self> {
            Ok(Self {
                columns: f.take("columns")?,
            })
        }
    }

    impl TransformationSpec for Keep {
        fn create_transformation(
            &self,
            _id: DatasetId,
            _admin: &dyn Administration,
        ) -> std::result::Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError> {
            Err(ExecError::Transformation(format!("keep {:?}", self.columns)))
        }
    }

    #[derive(Debug, Clone)]
    struct Other;

    impl Record for Other {
        fn shape() -> RecordShape {
            RecordShape::new("Other")
        }
        fn from_fields(_: &mut Fields) -> Result<Self> {
            Ok(Other)
        }
    }

    impl TransformationSpec for Other {
        fn create_transformation(
            &self,
            _id: DatasetId,
            _admin: &dyn Administration,
        ) -> std::result::Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError> {
            Err(ExecError::Transformation("other".into()))
        }
    }

    fn keep() -> Operation<Keep> {
        Operation::new(
            Kind::new("universe", "keep"),
            Keep {
                columns: vec!["_time".into(), "_value".into()],
            },
        )
    }

    #[test]
    fn copy_is_independent() {
        let original = new_procedure_spec::<Keep>(&keep()).unwrap();
        let mut copy = original.copy();
        copy.as_any_mut()
            .downcast_mut::<Procedure<Keep>>()
            .unwrap()
            .spec_mut()
            .columns
            .push("host".into());

        let original = original.as_any().downcast_ref::<Procedure<Keep>>().unwrap();
        assert_eq!(original.spec().columns, vec!["_time", "_value"]);
        assert_eq!(copy.kind(), original.kind());
    }

    #[test]
    fn wrong_operation_type_is_invalid_spec() {
        let err = new_procedure_spec::<Other>(&keep()).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSpec { kind, .. } if kind.as_str() == "universe.keep"));
    }

    #[test]
    fn exec_adapter_forwards_to_the_record() {
        let procedure = keep().into_procedure();
        let admin = opbind_exec::ParentSet::default();
        let err = create_transformation::<Keep>(DatasetId::new(0), &admin, &procedure)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), r#"transformation: keep ["_time", "_value"]"#);
    }
}
