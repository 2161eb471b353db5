//! Error types for converter specification.

use thiserror::Error;

/// Errors raised while specifying converters, methods and receive tables.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// A Down converter was requested for a deprecated message.
    #[error("deprecated message {message} has no Down converter ({function})")]
    DeprecatedDown {
        /// Fully-qualified message name.
        message: String,
        /// Requested function.
        function: String,
    },

    /// An entity has no counterpart on the hop a converter needs.
    #[error("{entity} has no counterpart for {function}")]
    Unresolved {
        /// Fully-qualified entity name.
        entity: String,
        /// Converter that needed it.
        function: String,
    },

    /// A nested converter does not produce the destination field's type.
    #[error("field {field}: {function} does not produce {expected}")]
    MissingConverter {
        /// Field path.
        field: String,
        /// Nested converter.
        function: String,
        /// Type the destination field holds.
        expected: String,
    },

    /// A method's request or response does not correspond to its target
    /// method's.
    #[error("method {method}: {role} {found} does not correspond to {expected}")]
    MethodMismatch {
        /// Method path.
        method: String,
        /// `input` or `output`.
        role: &'static str,
        /// Counterpart of the public message, or its own name.
        found: String,
        /// Message the target method declares.
        expected: String,
    },

    /// A receive directive names no value of the source enum.
    #[error("enum value {value} receives unknown value '{target}' of {enumeration}")]
    ReceiveValueNotFound {
        /// Public value path.
        value: String,
        /// Source enum name.
        enumeration: String,
        /// Name looked up.
        target: String,
    },

    /// A source value is claimed by two public values.
    #[error("enum value {source_value} is received by both {first} and {second}")]
    ReceiveConflict {
        /// Source value path.
        source_value: String,
        /// Public value that claimed it first.
        first: String,
        /// Public value that claimed it again.
        second: String,
    },
}

/// Result type for converter specification.
pub type ConversionResult<T> = Result<T, ConversionError>;
