//! Gateway error types.
//!
//! Every persistence backend maps its failures onto these three kinds;
//! the store catches them at the call boundary, logs, and leaves its
//! in-memory state unchanged.

use std::time::Duration;
use thiserror::Error;

/// Failure of a persistence-gateway operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The submitted record is malformed (missing required field,
    /// bad format).
    #[error("Invalid value for {field}: {reason}")]
    Validation {
        /// Wire name of the offending field.
        field: &'static str,
        reason: String,
    },

    /// The operation referenced a server id the backend does not know.
    #[error("No server with id {id}")]
    NotFound { id: String },

    /// The backend was unreachable, timed out, or returned something
    /// unintelligible.
    #[error("Persistence backend failure: {context}")]
    Transport {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GatewayError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn transport(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::Transport {
            context: format!("request exceeded the {}ms limit", limit.as_millis()),
            source: None,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { field, reason } => {
                format!("The server record could not be saved: {} ({})", reason, field)
            }
            Self::NotFound { id } => {
                format!(
                    "Server '{}' no longer exists. It may have been deleted elsewhere.",
                    id
                )
            }
            Self::Transport { .. } => {
                "The inventory backend could not be reached. Your local view is unchanged."
                    .to_string()
            }
        }
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
