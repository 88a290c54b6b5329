//! Plan-node contract and the cost hints the planner may ask for.

use std::any::Any;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use opbind_core::id::Kind;

/// Resource cost of running one plan node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub cpu: u64,
    pub memory: u64,
    pub disk: u64,
    pub network: u64,
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost {
            cpu: self.cpu.saturating_add(rhs.cpu),
            memory: self.memory.saturating_add(rhs.memory),
            disk: self.disk.saturating_add(rhs.disk),
            network: self.network.saturating_add(rhs.network),
        }
    }
}

/// Estimated output of a plan node, fed to its successors' `cost`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub rows: u64,
    pub bytes: u64,
}

/// Configuration of one logical plan node.
///
/// Invariants:
/// - `kind` never changes over the node's lifetime.
/// - `copy` returns storage independent from `self`: rewrite passes may
///   mutate one copy without the other observing it. The planner may call
///   it any number of times.
pub trait ProcedureSpec: fmt::Debug + Send + Sync {
    fn kind(&self) -> &Kind;

    fn copy(&self) -> Box<dyn ProcedureSpec>;

    /// Default hints: free, and nothing known about the output.
    fn cost(&self, _inputs: &[Statistics]) -> (Cost, Statistics) {
        (Cost::default(), Statistics::default())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn ProcedureSpec> {
    fn clone(&self) -> Self {
        self.copy()
    }
}
