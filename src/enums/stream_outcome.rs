use serde::Serialize;

/// How a single edit stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamOutcome {
    Completed,
    RunFailed,
    TransportFailed,
    IdleTimeout,
    BufferLimitExceeded,
    ClientDisconnected,
}

impl StreamOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Completed => "✅",
            Self::ClientDisconnected => "🔌",
            Self::IdleTimeout => "⏰",
            Self::RunFailed | Self::TransportFailed | Self::BufferLimitExceeded => "❌",
        }
    }
}
