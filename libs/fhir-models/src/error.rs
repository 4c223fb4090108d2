//! Error types for property tree access

use thiserror::Error;

/// Failures raised by generic property access and code parsing.
///
/// All of them are local to a single in-memory operation; nothing is retried
/// and a failed write leaves the node unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// The key or name matched no field in the node's schema or any supertype schema
    #[error("Unknown property '{key}' on {type_name}")]
    UnknownField { type_name: String, key: String },

    /// The supplied value cannot be stored in the field
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// The field does not allow a new element to be synthesized
    #[error("Cannot call addChild on a singleton property {path}")]
    NotConstructible { path: String },

    /// Strict parsing met a code outside the enumeration
    #[error("Unknown {code_system} code '{code}'")]
    UnknownCode { code_system: String, code: String },

    /// A read tried to materialize an absent value while auto-create is forbidden
    #[error("Attempt to auto-create {path}")]
    ConfigurationViolation { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
