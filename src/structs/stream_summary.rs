use serde::Serialize;
use crate::enums::stream_outcome::StreamOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub outcome: StreamOutcome,
    /// Elements surfaced to the sink, malformed ones included.
    pub elements: usize,
    pub buffered_bytes: usize,
}
