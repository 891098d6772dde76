use serde::{Deserialize, Serialize};
use crate::enums::delta_op::DeltaOp;
use crate::enums::stream_error_code::StreamErrorCode;
use crate::structs::finalized_payload::FinalizedPayload;

/// Payload of a single SSE `data:` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SseEvent {
    AppendedMessage {
        #[serde(rename = "appendedMessage")]
        appended_message: String,
    },
    DetectedDiff {
        diff: DeltaOp,
    },
    Finalized {
        finalized: FinalizedPayload,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
        #[serde(rename = "errorCode")]
        error_code: StreamErrorCode,
    },
}

impl SseEvent {
    pub fn appended_message(text: &str) -> Self {
        Self::AppendedMessage {
            appended_message: text.to_string(),
        }
    }

    pub fn detected_diff(op: &DeltaOp) -> Self {
        Self::DetectedDiff { diff: op.clone() }
    }

    pub fn finalized(message: &str, replacements: &[DeltaOp]) -> Self {
        Self::Finalized {
            finalized: FinalizedPayload {
                message: message.to_string(),
                replacements: replacements.to_vec(),
            },
        }
    }

    pub fn error(message: &str, code: StreamErrorCode) -> Self {
        Self::Error {
            error_message: message.to_string(),
            error_code: code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AppendedMessage { .. } => "appendedMessage",
            Self::DetectedDiff { .. } => "diff",
            Self::Finalized { .. } => "finalized",
            Self::Error { .. } => "error",
        }
    }
}
