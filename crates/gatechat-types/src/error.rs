use thiserror::Error;

use std::fmt;

/// Failures of a gateway exchange.
///
/// The variant is the tag; the human-readable text lives in [`describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The configured base URL cannot be turned into a request URL.
    InvalidConfiguration(String),
    /// The response was not HTTP or its body could not be read as JSON at all.
    MalformedResponse(String),
    /// Any non-200 status other than 401.
    HttpFailure { status: u16, message: String },
    /// Valid JSON of the wrong shape on the non-streaming path.
    DecodeFailure(String),
    /// Connection error, DNS failure or timeout.
    TransportFailure(String),
    /// HTTP 401.
    AuthenticationFailure,
    /// Health check failed.
    Unreachable,
}

impl SessionError {
    /// Whether this error means the gateway itself cannot be reached.
    ///
    /// Only an explicit unreachable outcome flips the reachability flag; a
    /// rejected credential or a dropped connection on one send does not.
    pub fn marks_unreachable(&self) -> bool {
        matches!(self, SessionError::Unreachable)
    }
}

/// Human-readable description of a session error.
pub fn describe(error: &SessionError) -> String {
    match error {
        SessionError::InvalidConfiguration(detail) => {
            format!("Invalid gateway configuration: {detail}")
        }
        SessionError::MalformedResponse(detail) => {
            format!("The gateway sent a malformed response: {detail}")
        }
        SessionError::HttpFailure { status, message } if message.is_empty() => {
            format!("Gateway request failed (HTTP {status})")
        }
        SessionError::HttpFailure { status, message } => {
            format!("Gateway request failed (HTTP {status}): {message}")
        }
        SessionError::DecodeFailure(detail) => {
            format!("Could not decode the gateway response: {detail}")
        }
        SessionError::TransportFailure(detail) => {
            format!("Connection to the gateway failed: {detail}")
        }
        SessionError::AuthenticationFailure => {
            "Authentication failed. Check the gateway token.".to_string()
        }
        SessionError::Unreachable => "The gateway is unreachable.".to_string(),
    }
}

/// Text that replaces a failed assistant reply.
pub fn failure_text(error: &SessionError) -> String {
    format!("⚠️ {}", describe(error))
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self))
    }
}

impl std::error::Error for SessionError {}

/// Errors from the conversation persistence store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(String),

    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
