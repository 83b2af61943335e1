//! Error types for Gangway
//!
//! One taxonomy for the whole core: authorization failures deny before any
//! data is touched, lifecycle denials carry a user-facing message, and
//! best-effort side channels (activity append, notification dispatch) are
//! logged by their call sites instead of surfacing here.

/// Main error type for Gangway operations
#[derive(Debug, thiserror::Error)]
pub enum GangwayError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Space is still in draft and not yet opened to stakeholders
    #[error("Project is not ready")]
    NotReady,

    /// Space has been archived
    #[error("Project is archived")]
    Archived,

    /// Space is completed; reads are allowed, writes are not
    #[error("Project is read-only")]
    ReadOnly,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GangwayError {
    /// Short, user-facing message. Internal detail stays in the Display
    /// impl and the logs; this is what a portal caller may show verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Unauthorized(_) => "You do not have access to this project.".into(),
            Self::Forbidden(_) => "You are not allowed to do that.".into(),
            Self::NotFound(_) => "We could not find what you were looking for.".into(),
            Self::NotReady => "This project is not ready yet.".into(),
            Self::Archived => "This project has been archived.".into(),
            Self::ReadOnly => "This project is finished and read-only.".into(),
            Self::Session(_) => {
                "Your session is no longer valid. Please use your invite link again.".into()
            }
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again.".into()
            }
        }
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for GangwayError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for GangwayError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<mongodb::error::Error> for GangwayError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for GangwayError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Database(format!("BSON encode error: {}", err))
    }
}

impl From<bson::de::Error> for GangwayError {
    fn from(err: bson::de::Error) -> Self {
        Self::Database(format!("BSON decode error: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for GangwayError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Session(err.to_string())
    }
}

/// Result type alias for Gangway operations
pub type Result<T> = std::result::Result<T, GangwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_short_and_safe() {
        let err = GangwayError::Database("connection pool exhausted at 10.0.0.3".into());
        assert!(!err.user_message().contains("10.0.0.3"));

        let err = GangwayError::ReadOnly;
        assert_eq!(err.user_message(), "This project is finished and read-only.");
    }
}
