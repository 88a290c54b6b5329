//! The named bag of dynamic values for one call.

use std::collections::BTreeSet;

use opbind_core::error::Error;
use opbind_core::value::{Object, Value};

use crate::error::DecodeError;

/// Argument name → value, plus the set of names somebody has read.
///
/// Whatever is never read is reported by [`Arguments::unused`]; the decoder
/// turns that into `UnexpectedArgument` so a typo never passes silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Object,
    consumed: BTreeSet<String>,
}

impl Arguments {
    pub fn new(values: Object) -> Self {
        Self {
            values,
            consumed: BTreeSet::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a bag from a JSON object (fixtures, embedders).
    pub fn from_json(json: serde_json::Value) -> Result<Self, Error> {
        match Value::try_from(json)? {
            Value::Object(values) => Ok(Self::new(values)),
            other => Err(Error::Value(format!(
                "arguments must be an object, got {}",
                other.value_type()
            ))),
        }
    }

    /// Read `name`, marking it consumed whether or not it is present.
    pub fn get(&mut self, name: &str) -> Option<&Value> {
        self.consumed.insert(name.to_string());
        self.values.get(name)
    }

    /// Like [`get`](Self::get) but moves the value out.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.consumed.insert(name.to_string());
        self.values.remove(name)
    }

    pub fn get_required(&mut self, name: &str) -> Result<&Value, DecodeError> {
        self.get(name).ok_or_else(|| DecodeError::MissingArgument {
            name: name.to_string(),
        })
    }

    /// Typed convenience getter for hand-written call sites.
    pub fn get_string(&mut self, name: &str) -> Result<Option<String>, DecodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(DecodeError::TypeMismatch {
                name: name.to_string(),
                expected: "string".into(),
                got: other.value_type(),
            }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names present in the bag that were never read, sorted.
    pub fn unused(&self) -> impl Iterator<Item = &str> + '_ {
        self.values
            .keys()
            .filter(|k| !self.consumed.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Object> for Arguments {
    fn from(values: Object) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unused_tracks_reads() {
        let mut args = Arguments::from_pairs([("a", "x"), ("b", "y"), ("c", "z")]);
        assert!(args.get("a").is_some());
        assert!(args.take("c").is_some());
        assert!(args.get("missing").is_none());
        assert_eq!(args.unused().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn typed_getter_reports_mismatch() {
        let mut args = Arguments::from_json(json!({"column": 4})).unwrap();
        let err = args.get_string("column").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                name: "column".into(),
                expected: "string".into(),
                got: opbind_core::value::ValueType::Int,
            }
        );
    }

    #[test]
    fn from_json_requires_object() {
        assert!(Arguments::from_json(json!([1, 2])).is_err());
    }
}
