//! Error types for the `voxa` runtime.
//!
//! A single error enum covers the object core (class registry, casts,
//! optional class operations), the containers, the utterance graph and the
//! processing boundary. Only [`Error::AllocationFailure`] and
//! [`Error::ConsistencyViolation`] are fatal; everything else is a local,
//! recoverable failure that leaves the affected structure unchanged.

use std::fmt;

/// Errors that can occur in the `voxa` runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid input to an API call.
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// No class with this name is registered.
    UnknownClass {
        /// The requested class name.
        name: String,
    },

    /// A class with this name is already registered.
    DuplicateClass {
        /// The clashing class name.
        name: String,
    },

    /// The instance is not of the requested class.
    InvalidCast {
        /// Ancestry of the instance.
        from: String,
        /// The requested class.
        to: String,
    },

    /// A typed getter found no value under the key.
    FeatureNotFound {
        /// The missing key.
        key: String,
    },

    /// The element class has no compare operation.
    NotComparable {
        /// The class lacking a compare operation.
        class: String,
    },

    /// The class does not provide an optional operation (print, copy).
    Unsupported {
        /// The class lacking the operation.
        class: String,
        /// The operation that was requested.
        operation: &'static str,
    },

    /// A relation with this name already exists on the utterance.
    DuplicateRelation {
        /// The clashing relation name.
        name: String,
    },

    /// No relation with this name exists on the utterance.
    RelationNotFound {
        /// The requested relation name.
        name: String,
    },

    /// An item or content handle refers to something that has been deleted.
    StaleItem,

    /// The shared content already has an item in the target relation.
    ContentAlreadyInRelation {
        /// The relation that already references the content.
        relation: String,
    },

    /// An item path could not be parsed.
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The voice does not define this utterance type.
    UnknownUttType {
        /// The requested utterance type.
        name: String,
    },

    /// The voice has no processor registered under this name.
    UnknownProcessor {
        /// The requested processor name.
        name: String,
    },

    /// A processing stage failed.
    Processor {
        /// Name of the failing stage.
        name: String,
        /// Stage-provided failure message.
        message: String,
    },

    /// Storage for a new element could not be obtained.
    AllocationFailure,

    /// An internal graph invariant is broken.
    ConsistencyViolation {
        /// Which invariant failed.
        reason: String,
    },
}

impl Error {
    /// Returns `true` for errors that abort the triggering operation and
    /// must not be retried.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::AllocationFailure | Error::ConsistencyViolation { .. }
        )
    }

    /// Builds a [`Error::Processor`] for a failing stage.
    pub fn processor(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Processor {
            name: name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn consistency(reason: impl Into<String>) -> Self {
        Error::ConsistencyViolation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument { reason } => {
                write!(f, "Invalid argument: {reason}")
            }
            Error::UnknownClass { name } => {
                write!(f, "Class '{name}' is not registered")
            }
            Error::DuplicateClass { name } => {
                write!(f, "Class '{name}' already exists in registry")
            }
            Error::InvalidCast { from, to } => {
                write!(f, "Cannot cast instance of '{from}' to '{to}'")
            }
            Error::FeatureNotFound { key } => {
                write!(f, "Feature '{key}' not found")
            }
            Error::NotComparable { class } => {
                write!(f, "Class '{class}' has no compare operation")
            }
            Error::Unsupported { class, operation } => {
                write!(f, "Class '{class}' does not support '{operation}'")
            }
            Error::DuplicateRelation { name } => {
                write!(f, "Relation '{name}' already exists")
            }
            Error::RelationNotFound { name } => {
                write!(f, "Relation '{name}' not found")
            }
            Error::StaleItem => write!(f, "Graph handle is stale"),
            Error::ContentAlreadyInRelation { relation } => {
                write!(
                    f,
                    "Shared content already has an item in relation '{relation}'"
                )
            }
            Error::InvalidPath { path, reason } => {
                write!(f, "Invalid item path '{path}': {reason}")
            }
            Error::UnknownUttType { name } => {
                write!(f, "Utterance type '{name}' is not defined")
            }
            Error::UnknownProcessor { name } => {
                write!(f, "Processor '{name}' is not registered")
            }
            Error::Processor { name, message } => {
                write!(f, "Processor '{name}' failed: {message}")
            }
            Error::AllocationFailure => write!(f, "Allocation failure"),
            Error::ConsistencyViolation { reason } => {
                write!(f, "Consistency violation: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<voxa_mem::ArenaFull> for Error {
    fn from(_: voxa_mem::ArenaFull) -> Self {
        Error::AllocationFailure
    }
}

/// Result type for `voxa` operations.
pub type Result<T> = std::result::Result<T, Error>;
