//! Logical plan built from a recorded query graph.
//!
//! Each recorded operation is resolved through the plan registry by its
//! `Kind`; predecessors follow the graph's parent edges.

use std::collections::{BTreeMap, HashMap};

use opbind_core::dag::QueryGraph;
use opbind_core::id::OpId;

use crate::error::PlanError;
use crate::operation::OperationSpec;
use crate::procedure::{Cost, ProcedureSpec, Statistics};
use crate::registry::PlanRegistry;

#[derive(Debug, Clone)]
pub struct PlanNode {
    pub id: OpId,
    pub spec: Box<dyn ProcedureSpec>,
    pub predecessors: Vec<OpId>,
}

/// Plan nodes in topological order.
#[derive(Debug, Clone, Default)]
pub struct LogicalPlan {
    nodes: Vec<PlanNode>,
}

impl LogicalPlan {
    pub fn build(
        graph: &QueryGraph,
        operations: &BTreeMap<OpId, Box<dyn OperationSpec>>,
        registry: &PlanRegistry,
    ) -> Result<Self, PlanError> {
        let mut nodes = Vec::with_capacity(graph.len());
        for id in graph.order() {
            let op = operations.get(&id).ok_or(PlanError::MissingOperation(id))?;
            let recorded = graph
                .node(id)
                .ok_or_else(|| PlanError::Graph(format!("{id} vanished from the graph")))?;
            if op.kind() != &recorded.kind {
                return Err(PlanError::Graph(format!(
                    "{id} was recorded as {} but its operation is {}",
                    recorded.kind,
                    op.kind()
                )));
            }
            let spec = registry.create_procedure_spec(op.as_ref())?;
            nodes.push(PlanNode {
                id,
                spec,
                predecessors: recorded.parents.clone(),
            });
        }
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn node(&self, id: OpId) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: OpId) -> Option<&mut PlanNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an independent copy of `id` with the same predecessors, as a
    /// rewrite pass does when it splits a shared branch.
    pub fn duplicate(&mut self, id: OpId) -> Result<OpId, PlanError> {
        let original = self
            .node(id)
            .ok_or_else(|| PlanError::Graph(format!("cannot duplicate unknown {id}")))?;
        let copy = PlanNode {
            id: OpId::new(self.next_id()),
            spec: original.spec.copy(),
            predecessors: original.predecessors.clone(),
        };
        let new_id = copy.id;
        // Predecessors are unchanged, so appending keeps the order topological.
        self.nodes.push(copy);
        Ok(new_id)
    }

    /// Sum of the nodes' cost hints, feeding each node its predecessors'
    /// output statistics.
    pub fn total_cost(&self) -> Cost {
        let mut stats: HashMap<OpId, Statistics> = HashMap::with_capacity(self.nodes.len());
        let mut total = Cost::default();
        for node in &self.nodes {
            let inputs: Vec<Statistics> = node
                .predecessors
                .iter()
                .map(|p| stats.get(p).copied().unwrap_or_default())
                .collect();
            let (cost, out) = node.spec.cost(&inputs);
            total = total + cost;
            stats.insert(node.id, out);
        }
        total
    }

    fn next_id(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| n.id.get() + 1)
            .max()
            .unwrap_or_default()
    }
}
