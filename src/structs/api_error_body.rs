use serde::{Deserialize, Serialize};
use crate::enums::stream_error_code::StreamErrorCode;
use crate::errors::RelayError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorItem {
    pub message: String,
    pub code: StreamErrorCode,
}

/// JSON body for requests rejected before streaming starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub errors: Vec<ApiErrorItem>,
}

impl From<&RelayError> for ApiErrorBody {
    fn from(error: &RelayError) -> Self {
        let message = match error {
            RelayError::ValidationError { constraint, .. } => constraint.clone(),
            RelayError::ServiceDisabled { .. } => "AI is not enabled".to_string(),
            other => other.to_string(),
        };

        Self {
            errors: vec![ApiErrorItem {
                message,
                code: error.stream_error_code(),
            }],
        }
    }
}
