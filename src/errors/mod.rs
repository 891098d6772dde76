use thiserror::Error;
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::stream_error_code::StreamErrorCode;
use crate::services::fragment_parser::FragmentError;

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    // Stream taxonomy
    #[error("Malformed element #{index}: {reason}")]
    MalformedElement {
        index: usize,
        reason: String,
    },
    #[error("threadId is not set")]
    UpstreamThreadMissing,
    #[error("Upstream run failed: {message}")]
    UpstreamRunFailed {
        message: String,
        code: StreamErrorCode,
    },
    #[error("Transport error during {operation}: {reason}")]
    TransportError {
        operation: String,
        reason: String,
    },
    #[error("Client disconnected")]
    ClientDisconnected,

    // Configuration errors
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
    #[error("Configuration file error at '{path}': {reason}")]
    ConfigurationFileError {
        path: String,
        reason: String,
    },

    // Request errors
    #[error("Validation error for field '{field}': {constraint}")]
    ValidationError {
        field: String,
        constraint: String,
    },
    #[error("AI is not enabled: {reason}")]
    ServiceDisabled {
        reason: String,
    },

    // Network/API errors
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        operation: String,
        status_code: Option<u16>,
        reason: String,
    },

    #[error("Parse error in {content_type}: {reason}")]
    ParseError {
        content_type: String,
        reason: String,
    },

    #[error("System error during {operation}: {reason}")]
    SystemError {
        operation: String,
        reason: String,
    },
}

impl RelayError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(|s| s.to_string()),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    pub fn transport_error(operation: &str, reason: &str) -> Self {
        Self::TransportError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn run_failed(message: &str, code: StreamErrorCode) -> Self {
        Self::UpstreamRunFailed {
            message: message.to_string(),
            code,
        }
    }

    pub fn validation_error(field: &str, constraint: &str) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            constraint: constraint.to_string(),
        }
    }

    pub fn service_disabled(reason: &str) -> Self {
        Self::ServiceDisabled {
            reason: reason.to_string(),
        }
    }

    pub fn system_error(operation: &str, reason: &str) -> Self {
        Self::SystemError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Recoverable errors are absorbed without an error frame: a malformed
    /// element is skipped and a departed client has nobody to tell.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedElement { .. } | Self::ClientDisconnected)
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SystemError { .. } => ErrorSeverity::Critical,
            Self::TransportError { .. } => ErrorSeverity::High,
            Self::UpstreamRunFailed { .. } => ErrorSeverity::High,
            Self::ConfigurationFileError { .. } => ErrorSeverity::High,
            Self::ServiceDisabled { .. } => ErrorSeverity::Medium,
            Self::NetworkError { .. } => ErrorSeverity::Medium,
            Self::ParseError { .. } => ErrorSeverity::Medium,
            Self::MalformedElement { .. } => ErrorSeverity::Low,
            Self::UpstreamThreadMissing => ErrorSeverity::Low,
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::ConfigurationError { .. } => ErrorSeverity::Low,
            Self::ClientDisconnected => ErrorSeverity::Low,
        }
    }

    /// Code sent to the client for this failure.
    pub fn stream_error_code(&self) -> StreamErrorCode {
        match self {
            Self::UpstreamThreadMissing => StreamErrorCode::ThreadIdIsNotSet,
            Self::UpstreamRunFailed { code, .. } => *code,
            Self::ServiceDisabled { .. } => StreamErrorCode::AiServiceDisabled,
            Self::ValidationError { .. } => StreamErrorCode::InvalidRequest,
            _ => StreamErrorCode::TransportError,
        }
    }

    /// Status for failures rejected before any SSE output is produced.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UpstreamThreadMissing | Self::ValidationError { .. } => 400,
            Self::ServiceDisabled { .. } => 501,
            Self::NetworkError { .. } | Self::UpstreamRunFailed { .. } => 502,
            _ => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message, field, suggestion } => {
                let mut msg = format!("Configuration Error: {}", message);
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {})", field));
                }
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {}", suggestion));
                }
                msg
            }
            Self::ConfigurationFileError { path, reason } => {
                format!("Configuration file error at '{}': {}\n💡 Check file permissions and syntax", path, reason)
            }
            Self::NetworkError { operation, status_code, reason } => {
                let mut msg = format!("Network error during {}: {}", operation, reason);
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (Status: {})", code));
                }
                msg.push_str("\n💡 Check the provider base URL and your connection");
                msg
            }
            Self::ServiceDisabled { reason } => {
                format!("AI is not enabled: {}\n💡 Set [ai].enabled and export the API key variable", reason)
            }
            other => other.to_string(),
        }
    }

    /// Text for an SSE error frame. Run and transport failures carry the
    /// provider's own wording.
    pub fn client_message(&self) -> String {
        match self {
            Self::UpstreamRunFailed { message, .. } => message.clone(),
            Self::TransportError { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }

    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🟠",
            Self::Critical => "🔴",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Error handler for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    /// Log the technical details and print the user-facing message.
    pub fn handle_error(error: &RelayError) {
        let severity = error.severity();
        log::error!("[{}] {}", severity.name(), error.technical_details());
        eprintln!("{} {}", severity.emoji(), error.user_message());
    }
}

/// Extension trait for Result to tag the failing operation
pub trait ResultExt<T> {
    fn with_operation(self, operation: &str) -> RelayResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<RelayError>,
{
    fn with_operation(self, operation: &str) -> RelayResult<T> {
        self.map_err(|e| match e.into() {
            RelayError::SystemError { reason, .. } => RelayError::SystemError {
                operation: operation.to_string(),
                reason,
            },
            RelayError::TransportError { reason, .. } => RelayError::TransportError {
                operation: operation.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl From<std::io::Error> for RelayError {
    fn from(error: std::io::Error) -> Self {
        RelayError::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::ParseError {
            content_type: "JSON".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for RelayError {
    fn from(error: toml::de::Error) -> Self {
        RelayError::ParseError {
            content_type: "TOML".to_string(),
            reason: error.message().to_string(),
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        RelayError::NetworkError {
            operation: "HTTP request".to_string(),
            status_code: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}

impl From<FragmentError> for RelayError {
    fn from(error: FragmentError) -> Self {
        let index = error.index();
        match error {
            FragmentError::Malformed { reason, .. } => RelayError::MalformedElement { index, reason },
        }
    }
}

impl From<AiProviderError> for RelayError {
    fn from(error: AiProviderError) -> Self {
        if error.is_run_failure() {
            RelayError::UpstreamRunFailed {
                code: error.stream_error_code(),
                message: error.to_string(),
            }
        } else {
            RelayError::TransportError {
                operation: "upstream stream".to_string(),
                reason: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_stream_rejections_map_to_client_statuses() {
        assert_eq!(RelayError::UpstreamThreadMissing.http_status(), 400);
        assert_eq!(
            RelayError::UpstreamThreadMissing.stream_error_code(),
            StreamErrorCode::ThreadIdIsNotSet
        );
        assert_eq!(RelayError::service_disabled("off").http_status(), 501);
        assert_eq!(RelayError::validation_error("markdown", "must be set").http_status(), 400);
    }

    #[test]
    fn provider_errors_split_into_run_and_transport_failures() {
        let run: RelayError = AiProviderError::ApiError("You exceeded your current quota".into()).into();
        assert_eq!(run.stream_error_code(), StreamErrorCode::BudgetExceeded);
        assert!(!run.is_recoverable());

        let wire: RelayError = AiProviderError::NetworkError("reset".into()).into();
        assert!(matches!(wire, RelayError::TransportError { .. }));
        assert_eq!(wire.stream_error_code(), StreamErrorCode::TransportError);
    }

    #[test]
    fn malformed_elements_and_disconnects_are_recoverable() {
        let error: RelayError = FragmentError::Malformed { index: 2, reason: "bad".into() }.into();
        assert!(matches!(error, RelayError::MalformedElement { index: 2, .. }));
        assert!(error.is_recoverable());
        assert_eq!(error.severity(), ErrorSeverity::Low);

        assert!(RelayError::ClientDisconnected.is_recoverable());
        assert!(!RelayError::transport_error("upstream read", "idle").is_recoverable());
    }

    #[test]
    fn client_message_keeps_provider_wording() {
        let error = RelayError::run_failed("Rate limit reached", StreamErrorCode::RateLimited);
        assert_eq!(error.client_message(), "Rate limit reached");
        assert_eq!(RelayError::transport_error("upstream read", "reset").client_message(), "reset");
    }
}
