use serde::Serialize;

/// Lifecycle of a reconciler session.
///
/// `Active -> Finalizing -> Finalized` on success, `Active -> Errored` on
/// failure. `Destroyed` is reachable from every state and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Finalizing,
    Finalized,
    Errored,
    Destroyed,
}

impl SessionState {
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Errored | Self::Destroyed)
    }
}
