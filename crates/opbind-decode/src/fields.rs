//! Decoder output: tag-checked values keyed by argument name.

use std::collections::{BTreeMap, BTreeSet};

use opbind_core::value::{Duration, Function, Object, StreamRef, Time, Value};

use crate::error::{DecodeError, Result};
use crate::record::FieldType;

/// One decoded field. Mirrors `FieldKind`: once a value is here its tag has
/// been checked against the declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(Time),
    Array(Vec<Decoded>),
    Object(Object),
    Any(Value),
    Record(Fields),
    Stream(StreamRef),
    Function(Function),
}

impl Decoded {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Decoded::Str(_) => "string",
            Decoded::Int(_) => "int",
            Decoded::Float(_) => "float",
            Decoded::Bool(_) => "bool",
            Decoded::Duration(_) => "duration",
            Decoded::Time(_) => "time",
            Decoded::Array(_) => "array",
            Decoded::Object(_) => "object",
            Decoded::Any(_) => "any",
            Decoded::Record(_) => "record",
            Decoded::Stream(_) => "stream",
            Decoded::Function(_) => "function",
        }
    }
}

/// Decoded fields of one record plus the stream references found in its
/// stream fields (nested records included), in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    record: &'static str,
    values: BTreeMap<String, Decoded>,
    // Optional bindings the call left out.
    omitted: BTreeSet<String>,
    parents: Vec<StreamRef>,
}

impl Fields {
    pub(crate) fn new(record: &'static str) -> Self {
        Self {
            record,
            values: BTreeMap::new(),
            omitted: BTreeSet::new(),
            parents: Vec::new(),
        }
    }

    pub(crate) fn omit(&mut self, binding: String) {
        self.omitted.insert(binding);
    }

    pub(crate) fn insert(&mut self, binding: String, value: Decoded) {
        self.values.insert(binding, value);
    }

    pub(crate) fn parents_mut(&mut self) -> &mut Vec<StreamRef> {
        &mut self.parents
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn parents(&self) -> &[StreamRef] {
        &self.parents
    }

    pub fn take_parents(&mut self) -> Vec<StreamRef> {
        std::mem::take(&mut self.parents)
    }

    pub fn contains(&self, binding: &str) -> bool {
        self.values.contains_key(binding)
    }

    pub fn get(&self, binding: &str) -> Option<&Decoded> {
        self.values.get(binding)
    }

    /// Move the field bound as `binding` into its Rust type.
    ///
    /// A field the call left out comes back as `None` for `Option<T>`. A
    /// field declared `.optional()` with a non-`Option` type comes back as
    /// its zero value (`0`, `""`, empty sequence, ...). Any other absent
    /// field is an internal error: the decoder should have rejected the call.
    pub fn take<T: FieldType>(&mut self, binding: &str) -> Result<T> {
        match self.values.remove(binding) {
            Some(decoded) => T::from_decoded(decoded).map_err(|e| match e {
                DecodeError::Internal(msg) => DecodeError::Internal(format!(
                    "record {}, field '{binding}': {msg}",
                    self.record
                )),
                other => other,
            }),
            None if self.omitted.contains(binding) => T::zero().ok_or_else(|| {
                DecodeError::Internal(format!(
                    "record {}: optional field '{binding}' was omitted and has no zero value",
                    self.record
                ))
            }),
            None => T::absent().ok_or_else(|| {
                DecodeError::Internal(format!(
                    "record {}: required field '{binding}' was not decoded",
                    self.record
                ))
            }),
        }
    }

    /// Optional field with a zero value: absent means `T::default()`.
    pub fn take_or_default<T: FieldType + Default>(&mut self, binding: &str) -> Result<T> {
        if self.values.contains_key(binding) {
            self.take(binding)
        } else {
            Ok(T::default())
        }
    }
}
