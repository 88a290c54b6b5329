//! Dynamic values handed over by the interpreter for one function call.
//!
//! The binding layer never performs arithmetic on these; it only inspects the
//! tag and moves payloads into statically-shaped records.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::{Kind, OpId};

/// Object payload: argument name → value, kept sorted for deterministic output.
pub type Object = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(Time),
    Array(Vec<Value>),
    Object(Object),
    Function(Function),
    Stream(StreamRef),
}

/// Tag of a [`Value`]; the names are what users see in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Duration,
    Time,
    Array,
    Object,
    Function,
    Stream,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Duration => "duration",
            ValueType::Time => "time",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Function => "function",
            ValueType::Stream => "stream",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Str(_) => ValueType::String,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::Duration(_) => ValueType::Duration,
            Value::Time(_) => ValueType::Time,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Function(_) => ValueType::Function,
            Value::Stream(_) => ValueType::Stream,
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&StreamRef> {
        match self {
            Value::Stream(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<StreamRef> for Value {
    fn from(s: StreamRef) -> Self {
        Value::Stream(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// JSON has no durations, times, functions or streams, so only the plain
/// variants can come from it. `null` is rejected.
impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(v: serde_json::Value) -> Result<Self> {
        use serde_json::Value as J;
        Ok(match v {
            J::Null => return Err(Error::Value("null has no dynamic value".into())),
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(
                    n.as_f64()
                        .ok_or_else(|| Error::Value(format!("unrepresentable number {n}")))?,
                ),
            },
            J::String(s) => Value::Str(s),
            J::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            J::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<Object>>()?,
            ),
        })
    }
}

impl Value {
    /// Parse JSON text, then convert as [`TryFrom<serde_json::Value>`] does.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Value::try_from(json)
    }
}

/// A query-language duration. Calendar months are kept apart from the fixed
/// nanosecond part because a month has no fixed length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    pub months: i64,
    pub nanoseconds: i64,
}

impl Duration {
    pub const fn from_nanos(nanoseconds: i64) -> Self {
        Self {
            months: 0,
            nanoseconds,
        }
    }

    pub const fn from_months(months: i64) -> Self {
        Self {
            months,
            nanoseconds: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.nanoseconds == 0
    }
}

/// Absolute point in time, nanoseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(i64);

impl Time {
    pub const fn from_unix_nanos(ns: i64) -> Self {
        Self(ns)
    }

    pub const fn unix_nanos(self) -> i64 {
        self.0
    }
}

/// "The output of another operator invocation in this query."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamRef {
    pub id: OpId,
    pub kind: Kind,
}

impl StreamRef {
    pub fn new(id: OpId, kind: impl Into<Kind>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream({}#{})", self.kind, self.id.get())
    }
}

/// Anything the interpreter can call. Implemented by the runtime's function
/// values; the binding layer only carries these around.
pub trait Callable: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a callable. Two handles are equal iff they point at the
/// same callable.
#[derive(Clone)]
pub struct Function(Arc<dyn Callable>);

impl Function {
    pub fn new<C: Callable>(callable: C) -> Self {
        Self(Arc::new(callable))
    }

    pub fn from_arc(callable: Arc<dyn Callable>) -> Self {
        Self(callable)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}
