use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnonyxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classifier service error: {0}")]
    Service(String),

    #[error("Classifier service returned HTTP {status}: {message}")]
    ServiceStatus { status: u16, message: String },

    /// Response the adapter cannot interpret: a body that is not JSON, or
    /// JSON of an unknown shape.
    #[error("Unrecognized classifier response: {0}")]
    Adapter(String),
}

impl AnonyxError {
    /// True for transport failures and non-success responses from the classifier.
    pub fn is_service_error(&self) -> bool {
        matches!(self, AnonyxError::Service(_) | AnonyxError::ServiceStatus { .. })
    }
}

impl From<reqwest::Error> for AnonyxError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return AnonyxError::ServiceStatus {
                status: status.as_u16(),
                message: e.to_string(),
            };
        }
        AnonyxError::Service(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnonyxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_grouping() {
        assert!(AnonyxError::Service("connection refused".into()).is_service_error());
        assert!(AnonyxError::ServiceStatus { status: 503, message: "loading".into() }.is_service_error());
        assert!(!AnonyxError::Adapter("number".into()).is_service_error());
        assert!(!AnonyxError::Config("HF_TOKENS".into()).is_service_error());
    }

    #[test]
    fn test_status_message_format() {
        let err = AnonyxError::ServiceStatus { status: 401, message: "Invalid token".into() };
        assert_eq!(err.to_string(), "Classifier service returned HTTP 401: Invalid token");
    }
}
