//! Calendar query error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    /// The event endpoint answered with a non-success status.
    #[error("Event endpoint returned {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed event response: {0}")]
    Parse(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid link: {0}")]
    InvalidLink(String),
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { status, .. } => {
                format!("Could not load availability (server returned {}).", status)
            }
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Parse(_) => "The server sent availability in an unexpected format.".to_string(),
            Self::InvalidRange(_) => "The requested date range is invalid.".to_string(),
            Self::InvalidDate(msg) => format!("Invalid date: {}", msg),
            Self::InvalidLink(_) => "That does not look like a calendar link.".to_string(),
        }
    }

    /// HTTP status of a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = CalendarError::Transport {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(err.user_message().contains("502"));

        let err = CalendarError::InvalidDate("tomorrow".into());
        assert!(err.user_message().contains("tomorrow"));

        let err = CalendarError::Parse("expected array".into());
        assert!(err.user_message().contains("unexpected format"));
    }

    #[test]
    fn test_transport_display_carries_body() {
        let err = CalendarError::Transport {
            status: 404,
            body: "no such route".into(),
        };
        assert_eq!(err.to_string(), "Event endpoint returned 404: no such route");
    }

    #[test]
    fn test_status() {
        let err = CalendarError::Transport {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(CalendarError::Parse("x".into()).status(), None);
    }
}
