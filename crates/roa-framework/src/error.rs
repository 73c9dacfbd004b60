//! # Framework Errors
//!
//! This module defines the common error types used throughout the ROA
//! framework. By centralizing error definitions, we ensure consistent error
//! handling across resolvers, actions, and storage collaborators.

/// Errors that can occur while resolving links, checking access, or running
/// the create action.
///
/// None of these are recovered internally: every variant propagates to the
/// caller, which decides how to surface it (see [`RoaError::http_status`]).
#[derive(Debug, thiserror::Error)]
pub enum RoaError {
    /// A self or resource-list link was requested before `resolve_links`
    /// ever ran for the record. A sequencing bug, not a user-facing failure.
    #[error("Resource link requested before resolution")]
    UnresolvedLink,
    /// A forced parent lookup went through the relation and found nothing.
    #[error("Parent relation `{relation}` yielded no record")]
    ParentNotFound { relation: String },
    /// An access rule denied the request, at this record or any ancestor.
    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },
    /// A save failed without attaching validation errors to the record.
    #[error("Failed to create the record for unknown reason")]
    UnknownPersistenceFailure,
    /// The storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RoaError {
    /// Shorthand for an [`RoaError::AccessDenied`] with the given reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Wraps an arbitrary storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(source))
    }

    /// The HTTP status this error maps to at the transport boundary.
    ///
    /// The framework defines no transport itself; this is the contract an
    /// HTTP-facing collaborator is expected to honor.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AccessDenied { .. } => 403,
            Self::ParentNotFound { .. } => 404,
            Self::UnresolvedLink | Self::UnknownPersistenceFailure | Self::Storage(_) => 500,
        }
    }
}
