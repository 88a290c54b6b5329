//! Compile context and the per-query dependency graph.
//!
//! Each operator invocation in a query gets an [`Administration`] while its
//! arguments are bound; every stream reference the binder finds is added as a
//! parent. The finished administration is then recorded in the
//! [`QueryGraph`], which hands back a [`StreamRef`] downstream calls can pipe.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::id::{Kind, OpId};
use crate::value::StreamRef;

/// Sink for dependency edges discovered while binding one call.
pub trait CompileContext {
    fn add_parent(&mut self, parent: StreamRef);
}

/// Parents collected for one operator invocation, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Administration {
    parents: Vec<StreamRef>,
}

impl Administration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parents(&self) -> &[StreamRef] {
        &self.parents
    }

    pub fn into_parents(self) -> Vec<StreamRef> {
        self.parents
    }
}

impl CompileContext for Administration {
    fn add_parent(&mut self, parent: StreamRef) {
        // The same upstream may be referenced twice (e.g. a self-join).
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationNode {
    pub id: OpId,
    pub kind: Kind,
    pub parents: Vec<OpId>,
}

/// DAG of operator invocations for one query compilation.
///
/// Parents must be recorded before their children, so the graph is acyclic
/// by construction and id order is a topological order.
#[derive(Debug, Clone, Default)]
pub struct QueryGraph {
    nodes: BTreeMap<OpId, OperationNode>,
    next_id: u64,
}

impl QueryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: Kind, admin: Administration) -> Result<StreamRef> {
        let mut parents = Vec::with_capacity(admin.parents().len());
        for parent in admin.into_parents() {
            let node = self
                .nodes
                .get(&parent.id)
                .ok_or_else(|| Error::Graph(format!("unknown parent {parent}")))?;
            if node.kind != parent.kind {
                return Err(Error::Graph(format!(
                    "parent {parent} refers to an operation of kind {}",
                    node.kind
                )));
            }
            parents.push(parent.id);
        }

        let id = OpId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            OperationNode {
                id,
                kind: kind.clone(),
                parents,
            },
        );
        Ok(StreamRef::new(id, kind))
    }

    pub fn node(&self, id: OpId) -> Option<&OperationNode> {
        self.nodes.get(&id)
    }

    pub fn parents(&self, id: OpId) -> &[OpId] {
        self.nodes
            .get(&id)
            .map(|n| n.parents.as_slice())
            .unwrap_or(&[])
    }

    pub fn children(&self, id: OpId) -> Vec<OpId> {
        self.nodes
            .values()
            .filter(|n| n.parents.contains(&id))
            .map(|n| n.id)
            .collect()
    }

    /// Operations without upstream dependencies (sources).
    pub fn roots(&self) -> Vec<OpId> {
        self.nodes
            .values()
            .filter(|n| n.parents.is_empty())
            .map(|n| n.id)
            .collect()
    }

    /// Topological order: every operation appears after its parents.
    pub fn order(&self) -> Vec<OpId> {
        self.nodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
