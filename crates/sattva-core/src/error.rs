//! Error types for the sattva workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stage of the session-deletion cascade.
///
/// Deletion removes messages, then retreats, then the session row itself.
/// The stage names which removal failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStage {
    Messages,
    Retreats,
    Session,
}

impl std::fmt::Display for DeleteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteStage::Messages => write!(f, "messages"),
            DeleteStage::Retreats => write!(f, "retreats"),
            DeleteStage::Session => write!(f, "session"),
        }
    }
}

/// A shared error type for the entire sattva application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SattvaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// Search provider error (request, status, or payload failure)
    #[error("Search error: {0}")]
    Search(String),

    /// Data access error (persistence gateway layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error (identity provider rejected the request)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Validation error, raised before any external call is made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session-deletion cascade failed partway through: an earlier stage
    /// already removed records when `stage` failed. The session is neither
    /// fully present nor fully gone and must be reported distinctly.
    #[error("Session '{session_id}' partially deleted: {stage} removal failed: {reason}")]
    PartialDelete {
        session_id: String,
        stage: DeleteStage,
        reason: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SattvaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a Search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a PartialDelete error
    pub fn partial_delete(
        session_id: impl Into<String>,
        stage: DeleteStage,
        reason: impl Into<String>,
    ) -> Self {
        Self::PartialDelete {
            session_id: session_id.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a PartialDelete error
    pub fn is_partial_delete(&self) -> bool {
        matches!(self, Self::PartialDelete { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SattvaError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for SattvaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SattvaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SattvaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            }
        } else {
            Self::DataAccess(err.to_string())
        }
    }
}

/// A type alias for `Result<T, SattvaError>`.
pub type Result<T> = std::result::Result<T, SattvaError>;
