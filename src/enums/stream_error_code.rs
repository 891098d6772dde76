use std::fmt;
use serde::{Deserialize, Serialize};

/// Error codes carried in `errorCode` of SSE error frames and in pre-stream
/// JSON error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamErrorCode {
    BudgetExceeded,
    RateLimited,
    ContextLengthExceeded,
    RunFailed,
    TransportError,
    ThreadIdIsNotSet,
    AiServiceDisabled,
    InvalidRequest,
}

impl StreamErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExceeded => "budget-exceeded",
            Self::RateLimited => "rate-limited",
            Self::ContextLengthExceeded => "context-length-exceeded",
            Self::RunFailed => "run-failed",
            Self::TransportError => "transport-error",
            Self::ThreadIdIsNotSet => "thread-id-is-not-set",
            Self::AiServiceDisabled => "ai-service-disabled",
            Self::InvalidRequest => "invalid-request",
        }
    }
}

impl fmt::Display for StreamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_kebab_case() {
        for code in [
            StreamErrorCode::BudgetExceeded,
            StreamErrorCode::RateLimited,
            StreamErrorCode::ContextLengthExceeded,
            StreamErrorCode::RunFailed,
            StreamErrorCode::TransportError,
            StreamErrorCode::ThreadIdIsNotSet,
            StreamErrorCode::AiServiceDisabled,
            StreamErrorCode::InvalidRequest,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
