//! Explicit record shapes. Pure data; the decoder walks these instead of
//! discovering fields at run time.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::value::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Duration,
    Time,
    // New scalar kinds go here and in the decoder's scalar match.
}

impl ScalarKind {
    pub fn value_type(self) -> ValueType {
        match self {
            ScalarKind::String => ValueType::String,
            ScalarKind::Int => ValueType::Int,
            ScalarKind::Float => ValueType::Float,
            ScalarKind::Bool => ValueType::Bool,
            ScalarKind::Duration => ValueType::Duration,
            ScalarKind::Time => ValueType::Time,
        }
    }
}

/// Declared shape of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Sequence; every element is decoded as the inner kind.
    Array(Box<FieldKind>),
    /// String-keyed mapping copied opaquely.
    Object,
    /// Raw value, copied without any check.
    Any,
    /// Nested record decoded from an object value.
    Record(RecordShape),
    /// Reference to an upstream operator's output; becomes a parent edge.
    Stream,
    /// Callable argument (e.g. a row function).
    Function,
}

impl FieldKind {
    pub fn array_of(inner: FieldKind) -> Self {
        FieldKind::Array(Box::new(inner))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(s) => f.write_str(s.value_type().name()),
            FieldKind::Array(inner) => write!(f, "array of {inner}"),
            FieldKind::Object => f.write_str("object"),
            FieldKind::Any => f.write_str("any"),
            FieldKind::Record(shape) => write!(f, "record {}", shape.name),
            FieldKind::Stream => f.write_str("stream"),
            FieldKind::Function => f.write_str("function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Declared field name.
    pub name: &'static str,
    /// Explicit argument name; wins over the derived one.
    pub rename: Option<&'static str>,
    pub required: bool,
    /// Supplied by upstream `|>` chaining.
    pub pipe: bool,
    /// Internal bookkeeping; never decoded.
    pub skip: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            rename: None,
            required: true,
            pipe: false,
            skip: false,
            kind,
        }
    }

    pub fn rename(mut self, arg: &'static str) -> Self {
        self.rename = Some(arg);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn pipe(mut self) -> Self {
        self.pipe = true;
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Argument name this field is looked up under: the explicit override, or
    /// the declared name with its first character lower-cased.
    pub fn binding_name(&self) -> String {
        if let Some(arg) = self.rename {
            return arg.to_string();
        }
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("record {record}: fields '{first}' and '{second}' are both marked pipe")]
    MultiplePipes {
        record: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("record {record}: argument name '{name}' is bound by more than one field")]
    DuplicateBinding { record: &'static str, name: String },
}

impl RecordShape {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields the decoder looks at, in declaration order.
    pub fn bound_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.skip)
    }

    pub fn pipe_field(&self) -> Option<&FieldSpec> {
        self.bound_fields().find(|f| f.pipe)
    }

    /// Definition-time checks: at most one pipe field and unique argument
    /// names, recursively through nested records.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let mut pipe: Option<&'static str> = None;
        let mut seen = HashSet::new();
        for field in self.bound_fields() {
            if field.pipe {
                if let Some(first) = pipe {
                    return Err(ShapeError::MultiplePipes {
                        record: self.name,
                        first,
                        second: field.name,
                    });
                }
                pipe = Some(field.name);
            }
            let binding = field.binding_name();
            if !seen.insert(binding.clone()) {
                return Err(ShapeError::DuplicateBinding {
                    record: self.name,
                    name: binding,
                });
            }
            validate_kind(&field.kind)?;
        }
        Ok(())
    }
}

fn validate_kind(kind: &FieldKind) -> Result<(), ShapeError> {
    match kind {
        FieldKind::Record(shape) => shape.validate(),
        FieldKind::Array(inner) => validate_kind(inner),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_name_lowercases_first_char() {
        let f = FieldSpec::new("Column", FieldKind::Scalar(ScalarKind::String));
        assert_eq!(f.binding_name(), "column");
        let f = FieldSpec::new("group_by", FieldKind::Any);
        assert_eq!(f.binding_name(), "group_by");
    }

    #[test]
    fn rename_wins_over_derived_name() {
        let f = FieldSpec::new("Tables", FieldKind::Stream).rename("tables_in");
        assert_eq!(f.binding_name(), "tables_in");
    }

    #[test]
    fn two_pipes_are_rejected() {
        let shape = RecordShape::new("Join")
            .with(FieldSpec::new("left", FieldKind::Stream).pipe())
            .with(FieldSpec::new("right", FieldKind::Stream).pipe());
        assert_eq!(
            shape.validate(),
            Err(ShapeError::MultiplePipes {
                record: "Join",
                first: "left",
                second: "right"
            })
        );
    }

    #[test]
    fn skipped_fields_are_ignored_by_validation() {
        let shape = RecordShape::new("Spec")
            .with(FieldSpec::new("tables", FieldKind::Stream).pipe())
            .with(FieldSpec::new("Tables", FieldKind::Stream).pipe().skip());
        assert!(shape.validate().is_ok());
        assert_eq!(shape.pipe_field().map(|f| f.name), Some("tables"));
    }

    #[test]
    fn duplicate_binding_after_derivation() {
        let shape = RecordShape::new("Spec")
            .with(FieldSpec::new("Column", FieldKind::Any))
            .with(FieldSpec::new("other", FieldKind::Any).rename("column"));
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::DuplicateBinding { ref name, .. }) if name == "column"
        ));
    }

    #[test]
    fn nested_records_are_validated() {
        let inner = RecordShape::new("Inner")
            .with(FieldSpec::new("a", FieldKind::Any))
            .with(FieldSpec::new("A", FieldKind::Any));
        let outer = RecordShape::new("Outer")
            .with(FieldSpec::new("items", FieldKind::array_of(FieldKind::Record(inner))));
        assert!(outer.validate().is_err());
    }

    #[test]
    fn kind_display() {
        let k = FieldKind::array_of(FieldKind::Scalar(ScalarKind::String));
        assert_eq!(k.to_string(), "array of string");
    }
}
