#![forbid(unsafe_code)]
//! opbind-function: register an operator once, get all three compiler
//! artifacts.
//!
//! ```text
//! register_transformation::<T>("universe", "fill", signature)
//!   ├─ function registry:  universe.fill → FunctionValue (binds args into T)
//!   ├─ plan registry:      "universe.fill" → Operation<T> ⇒ Procedure<T>
//!   └─ execution registry: "universe.fill" → Procedure<T> ⇒ T::create_transformation
//! ```
//!
//! Definition-time mistakes (bad shape, duplicate kind) are fatal through
//! `register_transformation`; `Registrar::try_register` reports them instead.

pub mod binder;
pub mod error;
pub mod procedure;
pub mod register;
pub mod transformation;

pub use binder::SpecFactory;
pub use error::RegistrationError;
pub use procedure::{create_transformation, new_procedure_spec, Operation, Procedure};
pub use register::{register_transformation, seal_all, Registrar};
pub use transformation::TransformationSpec;
