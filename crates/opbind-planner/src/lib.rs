#![forbid(unsafe_code)]
//! opbind-planner: the logical-planning side of an operator.
//!
//! - `OperationSpec`: what the surface language's call produced.
//! - `ProcedureSpec`: the plan-node counterpart (stable `Kind`, independent
//!   `copy`, cost hints).
//! - `PlanRegistry`: Kind → "operation spec to procedure spec" constructor.
//! - `LogicalPlan`: a recorded query resolved through the registry.
//!
//! The rule-based optimizer is not here; it only consumes these contracts.

pub mod error;
pub mod logical;
pub mod operation;
pub mod procedure;
pub mod registry;

pub use error::PlanError;
pub use logical::{LogicalPlan, PlanNode};
pub use operation::OperationSpec;
pub use procedure::{Cost, ProcedureSpec, Statistics};
pub use registry::{global_plan_registry, CreateProcedureSpec, PlanRegistry};
