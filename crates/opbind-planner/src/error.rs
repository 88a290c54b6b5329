use opbind_core::id::{Kind, OpId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no procedure spec registered for kind '{0}'")]
    UnknownKind(Kind),

    #[error("kind '{kind}': invalid spec type, expected {expected}")]
    InvalidSpec { kind: Kind, expected: &'static str },

    #[error("no operation spec for {0}")]
    MissingOperation(OpId),

    #[error("plan graph: {0}")]
    Graph(String),
}
