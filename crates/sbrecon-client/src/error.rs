//! Error types returned by Service Bus client implementations.
//!
//! Backends map their transport failures onto [`ClientError`] so the
//! reconciler can tell an "already exists" answer apart from everything else.

use std::fmt;

/// Errors that can occur while talking to the messaging backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The resource already exists remotely (HTTP 409 on the real service).
    #[error("Resource already exists: {resource_type}/{name}")]
    Conflict {
        /// Kind of resource, e.g. `queue` or `subscription`.
        resource_type: String,
        /// Name of the conflicting resource.
        name: String,
    },

    /// A parent resource required by the call does not exist.
    #[error("Resource not found: {resource_type}/{name}")]
    NotFound {
        /// Kind of resource that was missing.
        resource_type: String,
        /// Name of the missing resource.
        name: String,
    },

    /// The credentials were rejected by the backend.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message returned by the backend.
        message: String,
    },

    /// The backend could not be reached.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The backend answered with an unexpected status.
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// Status code reported by the backend.
        status: u16,
        /// Message returned by the backend.
        message: String,
    },

    /// An internal client error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl ClientError {
    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Remote` error.
    #[must_use]
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the backend reported that the resource already exists.
    ///
    /// A `Remote` error carrying status 409 counts as a conflict as well, since
    /// some backends do not classify their responses.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::Remote { status, .. } => *status == 409,
            _ => false,
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Remote { status: 409, .. } => ErrorCategory::Conflict,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Unauthorized { .. } => ErrorCategory::Auth,
            Self::Connection { .. } => ErrorCategory::Transport,
            Self::Remote { .. } => ErrorCategory::Transport,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of client errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Resource already exists.
    Conflict,
    /// Resource missing.
    NotFound,
    /// Authentication or authorization failure.
    Auth,
    /// Transport or remote failure.
    Transport,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not_found"),
            Self::Auth => write!(f, "auth"),
            Self::Transport => write!(f, "transport"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::conflict("queue", "orders");
        assert_eq!(err.to_string(), "Resource already exists: queue/orders");

        let err = ClientError::remote(500, "boom");
        assert_eq!(err.to_string(), "Remote error (500): boom");
    }

    #[test]
    fn test_conflict_predicate() {
        assert!(ClientError::conflict("queue", "orders").is_conflict());
        assert!(ClientError::remote(409, "exists").is_conflict());
        assert!(!ClientError::remote(500, "boom").is_conflict());
        assert!(!ClientError::connection("reset").is_conflict());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            ClientError::remote(409, "exists").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            ClientError::unauthorized("bad token").category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            ClientError::connection("reset").category(),
            ErrorCategory::Transport
        );
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
