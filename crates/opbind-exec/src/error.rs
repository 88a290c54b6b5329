use opbind_core::id::Kind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no transformation registered for kind '{0}'")]
    UnknownKind(Kind),

    #[error("kind '{kind}': invalid spec type, expected {expected}")]
    InvalidSpec { kind: Kind, expected: &'static str },

    #[error("transformation: {0}")]
    Transformation(String),
}
