use thiserror::Error;

/// Failure of a call to the user API.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
    },
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Invalid server URL: {0}")]
    Url(String),
    #[error("Failed to decode response: {0}")]
    Parse(String),
}

impl ServiceError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        match self {
            Self::Http { status_text, .. } => status_text,
            _ => "",
        }
    }

    /// Text meant for the user.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_server_message() {
        let err = ServiceError::Http {
            status: 401,
            status_text: "Unauthorized".to_string(),
            message: "Incorrect login or password".to_string(),
        };
        assert_eq!(err.message(), "Incorrect login or password");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.status_text(), "Unauthorized");
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = ServiceError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.status_text(), "");
        assert!(err.message().contains("connection refused"));
    }
}
