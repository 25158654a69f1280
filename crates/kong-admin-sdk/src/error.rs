// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for kong-admin-sdk.
//!
//! Every admin implementation (in-memory simulator or remote transport)
//! reports failures through [`AdminError`], so callers can write idempotent
//! workflows without knowing which backend they talk to.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type using AdminError.
pub type Result<T> = std::result::Result<T, AdminError>;

/// A unique-key field that collided with an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictField {
    /// Name of the unique field.
    pub field: String,
    /// The value that is already taken.
    pub value: String,
}

impl ConflictField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' already exists", self.field, self.value)
    }
}

/// Errors raised by admin operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// One or more unique fields are already present on another record.
    #[error("{resource} conflict: {}", join_conflicts(.conflicts))]
    Conflict {
        /// Resource kind the conflict was detected on.
        resource: String,
        /// Every offending field, not just the first.
        conflicts: Vec<ConflictField>,
    },

    /// The id or alternate key does not resolve to an existing record.
    #[error("{resource} not found: {key}")]
    NotFound {
        /// Resource kind that was looked up.
        resource: String,
        /// The id or alternate key that failed to resolve.
        key: String,
    },

    /// Caller input violates the admin contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn join_conflicts(conflicts: &[ConflictField]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AdminError {
    /// Create a conflict error.
    pub fn conflict(resource: impl Into<String>, conflicts: Vec<ConflictField>) -> Self {
        Self::Conflict {
            resource: resource.into(),
            conflicts,
        }
    }

    /// Create a not-found error.
    pub fn not_found(resource: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            key: key.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "CONFLICT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }

    /// HTTP status the gateway answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Conflict { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::InvalidArgument(_) => 400,
        }
    }

    /// Translate a gateway error status into the matching error kind.
    ///
    /// Returns `None` for statuses that have no contract meaning (5xx,
    /// redirects, success codes); transport clients surface those on their own.
    pub fn from_status(status: u16, resource: &str, message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        match status {
            409 => Some(Self::conflict(
                resource,
                vec![ConflictField::new("unknown", message)],
            )),
            404 => Some(Self::not_found(resource, message)),
            400 => Some(Self::InvalidArgument(message)),
            _ => None,
        }
    }

    /// Check if this error is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this error is a failed lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// The offending field names of a conflict (empty for other kinds).
    pub fn conflicting_fields(&self) -> Vec<&str> {
        match self {
            Self::Conflict { conflicts, .. } => {
                conflicts.iter().map(|c| c.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::InvalidArgument(err.to_string())
    }
}
