use thiserror::Error;
use crate::enums::stream_error_code::StreamErrorCode;
use crate::services::stream_error_codes::map_stream_error_code;

#[derive(Debug, Clone, Error)]
pub enum AiProviderError {
    #[error("Upstream API Error: {0}")]
    ApiError(String),
    #[error("Network Error: {0}")]
    NetworkError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
    #[error("Authentication Error: {0}")]
    AuthenticationError(String),
}

impl AiProviderError {
    /// Whether the failure came from the provider run rather than the wire.
    pub fn is_run_failure(&self) -> bool {
        matches!(self, Self::ApiError(_) | Self::AuthenticationError(_))
    }

    pub fn stream_error_code(&self) -> StreamErrorCode {
        match self {
            Self::ApiError(message) => map_stream_error_code(message),
            Self::AuthenticationError(_) => StreamErrorCode::RunFailed,
            Self::NetworkError(_) | Self::SerializationError(_) => StreamErrorCode::TransportError,
        }
    }
}
