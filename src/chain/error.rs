//! Error types for chain building and correspondence resolution.

use thiserror::Error;

use crate::descriptor::{AnnotationError, EntityKind};

/// Errors raised while building or resolving the version chain.
///
/// Every variant names the offending entity and, for resolution failures,
/// the package that was searched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// No package matched the configured private package name.
    #[error("private package '{0}' not found")]
    PrivatePackageNotFound(String),

    /// No public package declares a service.
    #[error("no public service versions found besides private package '{0}'")]
    EmptyChain(String),

    /// A package declares more than one service.
    #[error("package '{package}' declares more than one service: {first}, {second}")]
    AmbiguousService {
        /// Package name.
        package: String,
        /// First service found.
        first: String,
        /// Second service found.
        second: String,
    },

    /// The private package declares no service.
    #[error("private package '{0}' declares no service")]
    PrivateServiceMissing(String),

    /// Two fields of one message delegate to the same counterpart field.
    #[error("fields {first} and {second} both delegate to {target}")]
    AmbiguousDelegate {
        /// First field.
        first: String,
        /// Second field.
        second: String,
        /// Shared counterpart.
        target: String,
    },

    /// A field or method references a type that no chain version owns.
    #[error("{entity} references unknown type {type_name}")]
    MessageTypeNotFound {
        /// Referencing entity.
        entity: String,
        /// Referenced type name.
        type_name: String,
    },

    /// No counterpart message was found.
    #[error("message {message} not found in package {package} (looked up '{target}')")]
    MessageNotFound {
        /// Fully-qualified source message.
        message: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// No counterpart field was found.
    #[error("field {field} not found in package {package} (looked up '{target}')")]
    FieldNotFound {
        /// Fully-qualified source field.
        field: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// No counterpart oneof was found.
    #[error("oneof {oneof} not found in package {package} (looked up '{target}')")]
    OneofNotFound {
        /// Fully-qualified source oneof.
        oneof: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// No counterpart method was found.
    #[error("method {method} not found in package {package} (looked up '{target}')")]
    MethodNotFound {
        /// Fully-qualified source method.
        method: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// No counterpart enum was found.
    #[error("enum {enumeration} not found in package {package} (looked up '{target}')")]
    EnumNotFound {
        /// Fully-qualified source enum.
        enumeration: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// No counterpart enum value was found.
    #[error("enum value {value} not found in package {package} (looked up '{target}')")]
    EnumValueNotFound {
        /// Fully-qualified source value.
        value: String,
        /// Searched package.
        package: String,
        /// Name looked up.
        target: String,
    },

    /// An annotation on an entity could not be read.
    #[error("invalid annotation on {kind} {entity}: {source}")]
    Annotation {
        /// Kind of the annotated entity.
        kind: EntityKind,
        /// Fully-qualified entity name.
        entity: String,
        /// Underlying carrier error.
        source: AnnotationError,
    },
}

impl ChainError {
    /// Wraps an annotation error with its entity.
    #[must_use]
    pub fn annotation(kind: EntityKind, entity: impl Into<String>, source: AnnotationError) -> Self {
        Self::Annotation {
            kind,
            entity: entity.into(),
            source,
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
