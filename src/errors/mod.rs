//! # Error Handling
//!
//! Error taxonomy for BIG-IP REST operations using `thiserror`.
//!
//! A GET that returns 404 is not an error; the accessor reports it as `None`.
//! Every other failure (HTTP status, transport, JSON, local validation, poll
//! exhaustion) surfaces as a [`BigIpError`].

/// Custom result type for BIG-IP operations
pub type Result<T> = std::result::Result<T, BigIpError>;

/// Main error type for the BIG-IP client
#[derive(thiserror::Error, Debug)]
pub enum BigIpError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-2xx response from the appliance
    #[error("HTTP error: {method} {path} returned {status}: {message}")]
    Http { method: String, path: String, status: u16, message: String },

    /// Connection, TLS or timeout failure before a response was read
    #[error("Transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Lookup or workflow failures detected locally
    #[error("{message}")]
    Domain { message: String },

    /// License installation reported a terminal failure
    #[error("License installation failed for member '{member_id}': {message}")]
    License { member_id: String, message: String },

    /// Bounded polling gave up
    #[error("Operation timed out: {operation} after {attempts} attempts")]
    Timeout { operation: String, attempts: u32 },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BigIpError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create an HTTP error
    pub fn http<M, P, S>(method: M, path: P, status: u16, message: S) -> Self
    where
        M: Into<String>,
        P: Into<String>,
        S: Into<String>,
    {
        Self::Http { method: method.into(), path: path.into(), status, message: message.into() }
    }

    /// Wrap a reqwest failure
    pub fn transport<S: Into<String>>(context: S, source: reqwest::Error) -> Self {
        Self::Transport { context: context.into(), source }
    }

    /// Wrap a serde_json failure
    pub fn serialization<S: Into<String>>(context: S, source: serde_json::Error) -> Self {
        Self::Serialization { context: context.into(), source }
    }

    /// Create a domain error
    pub fn domain<S: Into<String>>(message: S) -> Self {
        Self::Domain { message: message.into() }
    }

    /// Create a license failure error
    pub fn license<I: Into<String>, S: Into<String>>(member_id: I, message: S) -> Self {
        Self::License { member_id: member_id.into(), message: message.into() }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, attempts: u32) -> Self {
        Self::Timeout { operation: operation.into(), attempts }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// HTTP status reported by the appliance, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BigIpError::Http { status, .. } => Some(*status),
            BigIpError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the appliance answered 404
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this error should be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            BigIpError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            BigIpError::Http { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            BigIpError::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for BigIpError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization("JSON serialization failed", error)
    }
}

impl From<std::io::Error> for BigIpError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { context: "I/O operation failed".to_string(), source: error }
    }
}

impl From<validator::ValidationErrors> for BigIpError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let error = BigIpError::http("DELETE", "/mgmt/tm/ltm/pool/~Common~web", 404, "not found");
        assert_eq!(
            error.to_string(),
            "HTTP error: DELETE /mgmt/tm/ltm/pool/~Common~web returned 404: not found"
        );
        assert_eq!(error.status_code(), Some(404));
        assert!(error.is_not_found());
    }

    #[test]
    fn test_domain_error_is_verbatim() {
        let error = BigIpError::domain("could not get the policy ID");
        assert_eq!(error.to_string(), "could not get the policy ID");
        assert_eq!(error.status_code(), None);
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = BigIpError::validation_field("only index.js and package.json", "file");
        if let BigIpError::Validation { field, .. } = error {
            assert_eq!(field, Some("file".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_retryable_errors() {
        assert!(BigIpError::timeout("license poll", 3).is_retryable());
        assert!(BigIpError::http("GET", "/mgmt", 503, "busy").is_retryable());
        assert!(!BigIpError::http("GET", "/mgmt", 400, "bad").is_retryable());
        assert!(!BigIpError::license("m-1", "INSTALLATION_FAILED").is_retryable());
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BigIpError = io_error.into();
        assert!(matches!(error, BigIpError::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: BigIpError = json_error.into();
        assert!(matches!(error, BigIpError::Serialization { .. }));
    }

    #[test]
    fn test_timeout_display() {
        let error = BigIpError::timeout("license member m-1", 5);
        assert_eq!(error.to_string(), "Operation timed out: license member m-1 after 5 attempts");
    }
}
