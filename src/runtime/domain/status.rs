//! Status values returned by generated services.

use std::fmt;

use thiserror::Error;

/// Message reported when a deprecated shape cannot represent a record.
pub const INCOMPATIBLE_RESOURCE: &str =
    "A requested resource is not compatible with this API version";

/// Status class, mirroring the RPC status codes generated services use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// The request or a received record is invalid.
    InvalidArgument,
    /// The system is not in a state the operation needs.
    FailedPrecondition,
    /// The resource does not exist.
    NotFound,
    /// An invariant of the generated code was broken.
    Internal,
}

impl Code {
    /// Canonical spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::FailedPrecondition => "FailedPrecondition",
            Self::NotFound => "NotFound",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RPC status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct Status {
    /// Status class.
    pub code: Code,
    /// Human-readable message.
    pub message: String,
}

impl Status {
    /// Creates a status.
    #[must_use]
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// `InvalidArgument` status.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    /// `FailedPrecondition` status.
    #[must_use]
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(Code::FailedPrecondition, message)
    }

    /// `NotFound` status.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    /// `Internal` status.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    /// Maps a missing-required failure of response Up conversion onto
    /// `FailedPrecondition`; other statuses pass through.
    #[must_use]
    pub fn incompatible(self) -> Self {
        if self.code == Code::InvalidArgument {
            Self::failed_precondition(INCOMPATIBLE_RESOURCE)
        } else {
            self
        }
    }
}
