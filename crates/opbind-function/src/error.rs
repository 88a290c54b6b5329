use opbind_core::id::Kind;
use opbind_core::registry::RegistryError;
use opbind_core::schema::ShapeError;
use thiserror::Error;

/// Definition-time failures. They reflect a mistake in how an operator was
/// written, never user input.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("registering {kind}: {source}")]
    Shape {
        kind: Kind,
        #[source]
        source: ShapeError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
