//! Error types for Horizon Gesture.
//!
//! Arbitration itself has no error path: losing a competition, rejected input
//! and dangling relation ids all show up as FAIL transitions or empty results.
//! These types cover the host-facing API (descriptor parsing and host-driven
//! state changes).

use crate::id::{GestureId, MemberId};

/// Result type alias for arena operations.
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Errors raised while building gesture descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// The declaration was not valid JSON or did not match the descriptor shape.
    #[error("Malformed gesture declaration: {0}")]
    Json(#[from] serde_json::Error),

    /// The `type` field named no known gesture family.
    #[error("Unknown gesture family code {0}")]
    UnknownFamily(i64),

    /// A tuning value was present but unusable.
    #[error("Invalid config value '{key}' on {gesture}: {message}")]
    InvalidConfig {
        gesture: GestureId,
        key: String,
        message: String,
    },
}

impl DescriptorError {
    /// Create a config error.
    pub fn invalid_config(
        gesture: GestureId,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            gesture,
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the arena's host-facing operations.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// No member with this id is registered.
    #[error("{0} is not registered in the arena")]
    UnknownMember(MemberId),

    /// The member exists but declares no descriptor with this id.
    #[error("{member} has no recognizer for {gesture}")]
    UnknownGesture { member: MemberId, gesture: GestureId },

    /// A host supplied a state code outside the known range.
    #[error("Invalid gesture state code {0}")]
    InvalidStateCode(i32),

    /// Descriptor parsing failed.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

impl ArenaError {
    /// Create an unknown-gesture error.
    pub fn unknown_gesture(member: MemberId, gesture: GestureId) -> Self {
        Self::UnknownGesture { member, gesture }
    }
}
