//! Opaque capability traits driven by the execution scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;

use opbind_core::value::Value;

use crate::error::ExecError;

/// Identifies the dataset a transformation writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct DatasetId(u64);

impl DatasetId {
    pub const fn new(v: u64) -> Self {
        Self(v)
    }
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetId({})", self.0)
    }
}

/// Per-node handle the scheduler passes to a transformation constructor.
pub trait Administration: Send + Sync {
    /// Datasets feeding this node, in parent order.
    fn parents(&self) -> &[DatasetId];
}

/// Consumes rows pushed from parent datasets.
///
/// Invariant: `finish` is called at most once per parent, after the last
/// `process` call for that parent.
pub trait Transformation: Send {
    fn label(&self) -> &str;

    fn process(&mut self, parent: DatasetId, rows: &[Value]) -> Result<(), ExecError>;

    fn finish(&mut self, parent: DatasetId, err: Option<&ExecError>);
}

/// Output side of a transformation.
pub trait Dataset: Send {
    fn id(&self) -> DatasetId;

    fn finish(&mut self, err: Option<&ExecError>);
}

/// Plain list of parents, for embedders without a scheduler of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentSet {
    parents: Vec<DatasetId>,
}

impl ParentSet {
    pub fn new(parents: impl IntoIterator<Item = DatasetId>) -> Self {
        Self {
            parents: parents.into_iter().collect(),
        }
    }
}

impl Administration for ParentSet {
    fn parents(&self) -> &[DatasetId] {
        &self.parents
    }
}
