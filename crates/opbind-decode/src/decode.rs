//! The value decoder.
//!
//! Per bound field, in declaration order:
//! 1. resolve the argument name (rename > derived); the pipe field is looked
//!    up under its own name like any other field,
//! 2. take the argument and mark it consumed; absent + required is an error,
//!    absent + optional leaves the field unset (and remembered as omitted),
//! 3. dispatch on the declared kind.
//!
//! After the last field, any argument nobody consumed is an error.

use opbind_core::config::BindConfig;
use opbind_core::schema::{FieldKind, RecordShape, ScalarKind};
use opbind_core::value::{StreamRef, Value, ValueType};

use crate::args::Arguments;
use crate::error::{DecodeError, Result};
use crate::fields::{Decoded, Fields};
use crate::record::Record;

/// A typed record plus the upstream streams its stream fields referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord<R> {
    pub record: R,
    pub parents: Vec<StreamRef>,
}

#[derive(Debug, Clone)]
pub struct Decoder {
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(&BindConfig::default())
    }
}

impl Decoder {
    pub fn new(cfg: &BindConfig) -> Self {
        Self {
            max_depth: cfg.max_depth,
        }
    }

    /// Decode `args` against `shape`. On error nothing useful is returned;
    /// the first failure wins.
    pub fn decode(&self, shape: &RecordShape, args: &mut Arguments) -> Result<Fields> {
        self.decode_record(shape, args, "", 0)
    }

    /// Decode straight into `R`, building its shape on the spot.
    pub fn decode_into<R: Record>(&self, args: &mut Arguments) -> Result<DecodedRecord<R>> {
        let shape = R::shape();
        let mut fields = self.decode(&shape, args)?;
        let parents = fields.take_parents();
        let record = R::from_fields(&mut fields)?;
        Ok(DecodedRecord { record, parents })
    }

    fn decode_record(
        &self,
        shape: &RecordShape,
        args: &mut Arguments,
        prefix: &str,
        depth: usize,
    ) -> Result<Fields> {
        let mut fields = Fields::new(shape.name);

        for field in shape.bound_fields() {
            let binding = field.binding_name();
            let path = join_path(prefix, &binding);

            let Some(value) = args.take(&binding) else {
                if field.required {
                    return Err(DecodeError::MissingArgument { name: path });
                }
                fields.omit(binding);
                continue;
            };

            let decoded = self.decode_value(&field.kind, value, &path, depth, fields.parents_mut())?;

            #[cfg(feature = "tracing")]
            tracing::trace!(
                record = shape.name,
                field = %path,
                pipe = field.pipe,
                kind = %field.kind,
                "decoded argument"
            );

            fields.insert(binding, decoded);
        }

        if let Some(name) = args.unused().next() {
            return Err(DecodeError::UnexpectedArgument {
                name: join_path(prefix, name),
            });
        }

        Ok(fields)
    }

    fn decode_value(
        &self,
        kind: &FieldKind,
        value: Value,
        path: &str,
        depth: usize,
        parents: &mut Vec<StreamRef>,
    ) -> Result<Decoded> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep {
                name: path.to_string(),
                limit: self.max_depth,
            });
        }

        // A stream may only land in a stream field or a raw one.
        if matches!(value, Value::Stream(_)) && !matches!(kind, FieldKind::Stream | FieldKind::Any)
        {
            return Err(DecodeError::InvalidDependency {
                name: path.to_string(),
                expected: kind.to_string(),
                got: ValueType::Stream,
            });
        }

        match (kind, value) {
            (FieldKind::Scalar(scalar), value) => decode_scalar(*scalar, value, path),

            (FieldKind::Array(inner), Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    out.push(self.decode_value(inner, item, &item_path, depth + 1, parents)?);
                }
                Ok(Decoded::Array(out))
            }

            // Downstream consumers interpret mappings themselves.
            (FieldKind::Object, Value::Object(object)) => Ok(Decoded::Object(object)),

            (FieldKind::Any, value) => Ok(Decoded::Any(value)),

            (FieldKind::Record(shape), Value::Object(object)) => {
                let mut sub = Arguments::new(object);
                let mut nested = self.decode_record(shape, &mut sub, path, depth + 1)?;
                // Edges are reported once, on the outermost record.
                parents.extend(nested.take_parents());
                Ok(Decoded::Record(nested))
            }

            (FieldKind::Stream, Value::Stream(stream)) => {
                parents.push(stream.clone());
                Ok(Decoded::Stream(stream))
            }

            (FieldKind::Stream, other) => Err(DecodeError::InvalidDependency {
                name: path.to_string(),
                expected: kind.to_string(),
                got: other.value_type(),
            }),

            (FieldKind::Function, Value::Function(f)) => Ok(Decoded::Function(f)),

            (kind, other) => Err(DecodeError::TypeMismatch {
                name: path.to_string(),
                expected: kind.to_string(),
                got: other.value_type(),
            }),
        }
    }
}

/// Decode `args` straight into `R` with a decoder built from `cfg`.
pub fn decode_record<R: Record>(args: &mut Arguments, cfg: &BindConfig) -> Result<DecodedRecord<R>> {
    Decoder::new(cfg).decode_into(args)
}

fn decode_scalar(kind: ScalarKind, value: Value, path: &str) -> Result<Decoded> {
    match (kind, value) {
        (ScalarKind::String, Value::Str(s)) => Ok(Decoded::Str(s)),
        (ScalarKind::Int, Value::Int(i)) => Ok(Decoded::Int(i)),
        (ScalarKind::Float, Value::Float(f)) => Ok(Decoded::Float(f)),
        (ScalarKind::Bool, Value::Bool(b)) => Ok(Decoded::Bool(b)),
        (ScalarKind::Duration, Value::Duration(d)) => Ok(Decoded::Duration(d)),
        (ScalarKind::Time, Value::Time(t)) => Ok(Decoded::Time(t)),
        (kind, other) => Err(DecodeError::TypeMismatch {
            name: path.to_string(),
            expected: kind.value_type().name().to_string(),
            got: other.value_type(),
        }),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use opbind_core::id::OpId;
    use opbind_core::schema::FieldSpec;
    use opbind_core::value::{Callable, Duration, Function, Time};
    use serde_json::json;

    struct Identity;

    impl Callable for Identity {
        fn name(&self) -> &str {
            "identity"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn scalar(name: &'static str, kind: ScalarKind) -> FieldSpec {
        FieldSpec::new(name, FieldKind::Scalar(kind))
    }

    fn args(json: serde_json::Value) -> Arguments {
        Arguments::from_json(json).unwrap()
    }

    #[test]
    fn all_scalar_kinds_decode() {
        let shape = RecordShape::new("Scalars")
            .with(scalar("s", ScalarKind::String))
            .with(scalar("i", ScalarKind::Int))
            .with(scalar("f", ScalarKind::Float))
            .with(scalar("b", ScalarKind::Bool))
            .with(scalar("d", ScalarKind::Duration))
            .with(scalar("t", ScalarKind::Time));
        let mut bag = Arguments::from_pairs([
            ("s", Value::string("x")),
            ("i", Value::Int(1)),
            ("f", Value::Float(1.5)),
            ("b", Value::Bool(true)),
            ("d", Value::Duration(Duration::from_nanos(10))),
            ("t", Value::Time(Time::from_unix_nanos(1_700_000_000))),
        ]);
        let fields = Decoder::default().decode(&shape, &mut bag).unwrap();
        assert_eq!(fields.get("i"), Some(&Decoded::Int(1)));
        assert_eq!(
            fields.get("d"),
            Some(&Decoded::Duration(Duration::from_nanos(10)))
        );
        assert_eq!(
            fields.get("t"),
            Some(&Decoded::Time(Time::from_unix_nanos(1_700_000_000)))
        );
    }

    #[test]
    fn scalar_kinds_accept_only_their_own_tag() {
        let month = Duration::from_months(1);
        let noon = Time::from_unix_nanos(43_200_000_000_000);
        let cases = [
            (ScalarKind::String, Value::string("x"), Decoded::Str("x".into()), Value::Int(1)),
            (ScalarKind::Int, Value::Int(1), Decoded::Int(1), Value::Float(1.0)),
            (ScalarKind::Float, Value::Float(1.5), Decoded::Float(1.5), Value::string("1.5")),
            (ScalarKind::Bool, Value::Bool(true), Decoded::Bool(true), Value::string("true")),
            (ScalarKind::Duration, Value::Duration(month), Decoded::Duration(month), Value::Int(60)),
            (ScalarKind::Time, Value::Time(noon), Decoded::Time(noon), Value::Duration(month)),
        ];

        for (kind, good, want, bad) in cases {
            let shape = RecordShape::new("Scalar").with(scalar("v", kind));

            let mut bag = Arguments::from_pairs([("v", good)]);
            let fields = Decoder::default().decode(&shape, &mut bag).unwrap();
            assert_eq!(fields.get("v"), Some(&want), "{kind:?}");

            let got = bad.value_type();
            let mut bag = Arguments::from_pairs([("v", bad)]);
            let err = Decoder::default().decode(&shape, &mut bag).unwrap_err();
            assert_eq!(
                err,
                DecodeError::TypeMismatch {
                    name: "v".into(),
                    expected: kind.value_type().name().into(),
                    got,
                },
                "{kind:?}"
            );
        }
    }

    #[test]
    fn int_is_not_widened_into_a_float_field() {
        let shape = RecordShape::new("Ratio").with(scalar("ratio", ScalarKind::Float));
        let err = Decoder::default()
            .decode(&shape, &mut args(json!({"ratio": 1})))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                name: "ratio".into(),
                expected: "float".into(),
                got: ValueType::Int,
            }
        );
    }

    #[test]
    fn function_field_keeps_the_handle() {
        let shape = RecordShape::new("Map").with(FieldSpec::new("fn", FieldKind::Function));
        let handle = Function::new(Identity);

        let mut bag = Arguments::from_pairs([("fn", Value::Function(handle.clone()))]);
        let fields = Decoder::default().decode(&shape, &mut bag).unwrap();
        match fields.get("fn") {
            Some(Decoded::Function(f)) => {
                assert_eq!(f, &handle);
                assert_eq!(f.name(), "identity");
            }
            other => panic!("expected a function, got {other:?}"),
        }

        let mut bag = Arguments::from_pairs([("fn", Value::string("identity"))]);
        let err = Decoder::default().decode(&shape, &mut bag).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                name: "fn".into(),
                expected: "function".into(),
                got: ValueType::String,
            }
        );
    }

    #[test]
    fn optional_absent_field_is_left_unset() {
        let shape = RecordShape::new("Opt").with(scalar("n", ScalarKind::Int).optional());
        let mut fields = Decoder::default().decode(&shape, &mut Arguments::default()).unwrap();
        assert!(!fields.contains("n"));
        assert_eq!(fields.take::<i64>("n").unwrap(), 0);
    }

    #[test]
    fn nested_errors_carry_the_path() {
        let inner = RecordShape::new("Inner").with(scalar("name", ScalarKind::String));
        let shape = RecordShape::new("Outer").with(FieldSpec::new(
            "columns",
            FieldKind::array_of(FieldKind::Record(inner)),
        ));
        let err = Decoder::default()
            .decode(&shape, &mut args(json!({"columns": [{"name": "a"}, {"name": 3}]})))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                name: "columns[1].name".into(),
                expected: "string".into(),
                got: ValueType::Int,
            }
        );
    }

    #[test]
    fn unexpected_argument_in_nested_record() {
        let inner = RecordShape::new("Inner").with(scalar("name", ScalarKind::String));
        let shape = RecordShape::new("Outer").with(FieldSpec::new("column", FieldKind::Record(inner)));
        let err = Decoder::default()
            .decode(&shape, &mut args(json!({"column": {"name": "a", "nmae": "b"}})))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedArgument {
                name: "column.nmae".into()
            }
        );
    }

    #[test]
    fn stream_in_plain_field_is_invalid_dependency() {
        let shape = RecordShape::new("Spec").with(scalar("column", ScalarKind::String));
        let mut bag = Arguments::from_pairs([(
            "column",
            Value::Stream(StreamRef::new(OpId::new(0), "from")),
        )]);
        let err = Decoder::default().decode(&shape, &mut bag).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDependency { got: ValueType::Stream, .. }));
    }

    #[test]
    fn array_of_streams_collects_every_parent() {
        let shape = RecordShape::new("Union")
            .with(FieldSpec::new("tables", FieldKind::array_of(FieldKind::Stream)));
        let a = StreamRef::new(OpId::new(0), "from");
        let b = StreamRef::new(OpId::new(1), "range");
        let mut bag = Arguments::from_pairs([(
            "tables",
            Value::Array(vec![a.clone().into(), b.clone().into()]),
        )]);
        let fields = Decoder::default().decode(&shape, &mut bag).unwrap();
        assert_eq!(fields.parents(), &[a, b]);
    }

    #[test]
    fn depth_limit_applies() {
        let shape = RecordShape::new("Deep").with(FieldSpec::new(
            "m",
            FieldKind::array_of(FieldKind::array_of(FieldKind::Scalar(ScalarKind::Int))),
        ));
        let decoder = Decoder::new(&BindConfig::default().with_max_depth(1));
        let err = decoder
            .decode(&shape, &mut args(json!({"m": [[1]]})))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooDeep {
                name: "m[0][0]".into(),
                limit: 1
            }
        );
    }
}
