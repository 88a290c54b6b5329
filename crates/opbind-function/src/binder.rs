//! Operation binder: one record shape, captured at registration.

use std::marker::PhantomData;

use opbind_core::prelude::{BindConfig, CompileContext, Kind, RecordShape, ShapeError};
use opbind_decode::{Arguments, DecodeError, Decoder};

use crate::procedure::Operation;
use crate::transformation::TransformationSpec;

pub struct SpecFactory<T> {
    kind: Kind,
    shape: RecordShape,
    decoder: Decoder,
    _spec: PhantomData<fn() -> T>,
}

impl<T: TransformationSpec> SpecFactory<T> {
    /// Build and validate `T`'s shape once.
    pub fn new(kind: Kind, cfg: &BindConfig) -> Result<Self, ShapeError> {
        let shape = T::shape();
        shape.validate()?;
        Ok(Self {
            kind,
            shape,
            decoder: Decoder::new(cfg),
            _spec: PhantomData,
        })
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn shape(&self) -> &RecordShape {
        &self.shape
    }

    /// Bind one call's arguments into `T`.
    ///
    /// Parent edges are added to `ctx` only once the whole record decoded,
    /// so a failed call leaves the graph untouched.
    pub fn create_op_spec(
        &self,
        mut args: Arguments,
        ctx: &mut dyn CompileContext,
    ) -> Result<Operation<T>, DecodeError> {
        let mut fields = self.decoder.decode(&self.shape, &mut args)?;
        let parents = fields.take_parents();
        let spec = T::from_fields(&mut fields)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %self.kind, parents = parents.len(), "bound operation");

        for parent in parents {
            ctx.add_parent(parent);
        }
        Ok(Operation::new(self.kind.clone(), spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opbind_core::prelude::{Administration, OpId, StreamRef, Value};
    use opbind_decode::{field, Fields, Record, Result};
    use opbind_exec::{self as exec, DatasetId, ExecError};

    #[derive(Debug, Clone, PartialEq)]
    struct Join {
        left: StreamRef,
        right: StreamRef,
        on: String,
    }

    impl Record for Join {
        fn shape() -> RecordShape {
            RecordShape::new("Join")
                .with(field::<StreamRef>("Left").pipe())
                .with(field::<StreamRef>("Right"))
                .with(field::<String>("On"))
        }

        fn from_fields(f: &mut Fields) -> Result<Self> {
            Ok(Self {
                left: f.take("left")?,
                right: f.take("right")?,
                on: f.take("on")?,
            })
        }
    }

    impl TransformationSpec for Join {
        fn create_transformation(
            &self,
            _id: DatasetId,
            _admin: &dyn exec::Administration,
        ) -> std::result::Result<(Box<dyn exec::Transformation>, Box<dyn exec::Dataset>), ExecError>
        {
            Err(ExecError::Transformation("not runnable".into()))
        }
    }

    fn factory() -> SpecFactory<Join> {
        SpecFactory::new(Kind::new("universe", "join"), &BindConfig::default()).unwrap()
    }

    #[test]
    fn both_streams_become_parents() {
        let left = StreamRef::new(OpId::new(0), "from");
        let right = StreamRef::new(OpId::new(1), "from");
        let args = Arguments::from_pairs([
            ("left", Value::Stream(left.clone())),
            ("right", Value::Stream(right.clone())),
            ("on", Value::string("host")),
        ]);
        let mut admin = Administration::new();
        let op = factory().create_op_spec(args, &mut admin).unwrap();
        assert_eq!(admin.parents(), &[left, right]);
        assert_eq!(op.spec().on, "host");
    }

    #[test]
    fn failed_bind_adds_no_parents() {
        let args = Arguments::from_pairs([
            ("left", Value::Stream(StreamRef::new(OpId::new(0), "from"))),
            ("right", Value::Stream(StreamRef::new(OpId::new(1), "from"))),
            ("on", Value::Int(3)),
        ]);
        let mut admin = Administration::new();
        assert!(factory().create_op_spec(args, &mut admin).is_err());
        assert!(admin.parents().is_empty());
    }
}
