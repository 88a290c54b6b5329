use opbind_decode::DecodeError;
use thiserror::Error;

use crate::registry::PackageMember;

#[derive(Debug, Error)]
pub enum CallError {
    #[error("no function {0}")]
    UnknownFunction(PackageMember),

    #[error("value is not a function value: {0}")]
    NotCallable(String),

    #[error("calling {function}: {source}")]
    Bind {
        function: String,
        #[source]
        source: DecodeError,
    },
}
