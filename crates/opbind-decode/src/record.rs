//! Typed side of decoding: which Rust types can sit in a record and how a
//! record describes itself.
//!
//! A record implements [`Record`] by listing its fields once:
//!
//! ```
//! use opbind_core::schema::RecordShape;
//! use opbind_core::value::StreamRef;
//! use opbind_decode::{field, Fields, Record, Result};
//!
//! #[derive(Debug, Clone)]
//! struct Distinct {
//!     tables: StreamRef,
//!     column: Option<String>,
//! }
//!
//! impl Record for Distinct {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("Distinct")
//!             .with(field::<StreamRef>("Tables").pipe())
//!             .with(field::<Option<String>>("Column"))
//!     }
//!
//!     fn from_fields(f: &mut Fields) -> Result<Self> {
//!         Ok(Self {
//!             tables: f.take("tables")?,
//!             column: f.take("column")?,
//!         })
//!     }
//! }
//! ```

use std::ops::{Deref, DerefMut};

use opbind_core::schema::{FieldKind, FieldSpec, RecordShape, ScalarKind};
use opbind_core::value::{Duration, Function, Object, StreamRef, Time, Value};

use crate::error::{DecodeError, Result};
use crate::fields::{Decoded, Fields};

/// A statically-shaped configuration record.
pub trait Record: Sized {
    /// Field list, built once per registration.
    fn shape() -> RecordShape;

    /// Move decoded fields into `Self`. Only called after `shape()` decoded
    /// successfully, so failures here are internal.
    fn from_fields(fields: &mut Fields) -> Result<Self>;
}

/// A Rust type that can be the type of a record field.
pub trait FieldType: Sized {
    fn kind() -> FieldKind;

    fn required() -> bool {
        true
    }

    fn from_decoded(decoded: Decoded) -> Result<Self>;

    /// Value for an argument that was not supplied, if the type has one.
    fn absent() -> Option<Self> {
        None
    }

    /// Value for a field declared `.optional()` that the call left out.
    fn zero() -> Option<Self> {
        Self::absent()
    }
}

/// Field spec whose kind and required flag come from `T`.
pub fn field<T: FieldType>(name: &'static str) -> FieldSpec {
    let spec = FieldSpec::new(name, T::kind());
    if T::required() {
        spec
    } else {
        spec.optional()
    }
}

fn mismatch(expected: &FieldKind, got: &Decoded) -> DecodeError {
    DecodeError::Internal(format!(
        "expected {expected}, decoded {}",
        got.variant_name()
    ))
}

macro_rules! leaf_field {
    ($ty:ty, $kind:expr, $variant:ident, zero) => {
        leaf_field!($ty, $kind, $variant, {
            fn zero() -> Option<Self> {
                Some(<$ty>::default())
            }
        });
    };
    ($ty:ty, $kind:expr, $variant:ident) => {
        leaf_field!($ty, $kind, $variant, {});
    };
    ($ty:ty, $kind:expr, $variant:ident, { $($extra:tt)* }) => {
        impl FieldType for $ty {
            fn kind() -> FieldKind {
                $kind
            }

            $($extra)*

            fn from_decoded(decoded: Decoded) -> Result<Self> {
                match decoded {
                    Decoded::$variant(v) => Ok(v),
                    other => Err(mismatch(&Self::kind(), &other)),
                }
            }
        }
    };
}

leaf_field!(String, FieldKind::Scalar(ScalarKind::String), Str, zero);
leaf_field!(i64, FieldKind::Scalar(ScalarKind::Int), Int, zero);
leaf_field!(f64, FieldKind::Scalar(ScalarKind::Float), Float, zero);
leaf_field!(bool, FieldKind::Scalar(ScalarKind::Bool), Bool, zero);
leaf_field!(Duration, FieldKind::Scalar(ScalarKind::Duration), Duration, zero);
leaf_field!(Time, FieldKind::Scalar(ScalarKind::Time), Time, zero);
leaf_field!(Object, FieldKind::Object, Object, zero);
leaf_field!(Value, FieldKind::Any, Any);
leaf_field!(StreamRef, FieldKind::Stream, Stream);
leaf_field!(Function, FieldKind::Function, Function);

impl<T: FieldType> FieldType for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::array_of(T::kind())
    }

    fn zero() -> Option<Self> {
        Some(Vec::new())
    }

    fn from_decoded(decoded: Decoded) -> Result<Self> {
        match decoded {
            Decoded::Array(items) => items.into_iter().map(T::from_decoded).collect(),
            other => Err(mismatch(&Self::kind(), &other)),
        }
    }
}

/// Optional argument; absent decodes to `None`.
impl<T: FieldType> FieldType for Option<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn required() -> bool {
        false
    }

    fn from_decoded(decoded: Decoded) -> Result<Self> {
        T::from_decoded(decoded).map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

/// A record embedded in another record, decoded from an object argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nested<R>(pub R);

impl<R> Nested<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> Deref for Nested<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}

impl<R> DerefMut for Nested<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.0
    }
}

impl<R: Record> FieldType for Nested<R> {
    fn kind() -> FieldKind {
        FieldKind::Record(R::shape())
    }

    fn from_decoded(decoded: Decoded) -> Result<Self> {
        match decoded {
            Decoded::Record(mut fields) => R::from_fields(&mut fields).map(Nested),
            other => Err(mismatch(&Self::kind(), &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_fields_are_optional() {
        let spec = field::<Option<i64>>("Limit");
        assert!(!spec.required);
        assert_eq!(spec.kind, FieldKind::Scalar(ScalarKind::Int));
        assert!(field::<Vec<String>>("values").required);
    }

    #[test]
    fn vec_converts_elementwise() {
        let decoded = Decoded::Array(vec![Decoded::Str("a".into()), Decoded::Str("b".into())]);
        let v: Vec<String> = FieldType::from_decoded(decoded).unwrap();
        assert_eq!(v, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn wrong_variant_is_internal() {
        let err = <i64 as FieldType>::from_decoded(Decoded::Str("x".into())).unwrap_err();
        assert!(matches!(err, DecodeError::Internal(_)));
    }
}
