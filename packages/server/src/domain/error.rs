//! Domain errors.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Client ID must not be empty")]
    EmptyClientId,

    #[error("Client ID '{0}' is reserved")]
    ReservedClientId(String),

    #[error("Display name must not be empty")]
    EmptyDisplayName,

    #[error("Invalid cursor color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}
