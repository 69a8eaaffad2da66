// Failure taxonomy for outbound moderation actions.
//
// The Discord layer converts serenity errors into this enum so the core can
// decide what to retry and what to show the invoking moderator.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// The invoking user lacks a required grant.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The bot itself lacks a grant (HTTP 403 or a cached permission check).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Target user, role, channel or message is gone.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API pushed back. `retry_after` is the server hint when one was given.
    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {0}")]
    Api(String),
}

impl ActionError {
    /// Classify an HTTP failure by status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            403 => ActionError::Forbidden(message),
            404 => ActionError::NotFound(message),
            429 => ActionError::RateLimited { retry_after: None },
            _ => ActionError::Api(format!("{} ({})", message, status)),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ActionError::RateLimited { .. })
    }

    /// Whether the failure should be shown to the moderator and otherwise dropped.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ActionError::PermissionDenied(_) | ActionError::Forbidden(_) | ActionError::NotFound(_)
        )
    }

    /// Text for the notice posted back to the invoking user.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::PermissionDenied(_) => {
                "❌ You don't have permission to use this command.".to_string()
            }
            ActionError::Forbidden(_) => "❌ I don't have the required permissions.".to_string(),
            ActionError::NotFound(what) => format!("❌ Not found: {}", what),
            ActionError::RateLimited { .. } => {
                "❌ Discord is rate limiting me right now. Please try again shortly.".to_string()
            }
            ActionError::Api(_) => "❌ An unexpected error occurred.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ActionError::from_status(403, "Missing Permissions"),
            ActionError::Forbidden(_)
        ));
        assert!(matches!(
            ActionError::from_status(404, "Unknown Member"),
            ActionError::NotFound(_)
        ));
        assert!(ActionError::from_status(429, "slow down").is_rate_limited());
        assert!(matches!(
            ActionError::from_status(500, "boom"),
            ActionError::Api(_)
        ));
    }

    #[test]
    fn test_user_facing_split() {
        assert!(ActionError::NotFound("member".into()).is_user_facing());
        assert!(ActionError::PermissionDenied("ban".into()).is_user_facing());
        assert!(!ActionError::Api("x".into()).is_user_facing());
        assert!(!ActionError::RateLimited { retry_after: None }.is_user_facing());
    }
}
