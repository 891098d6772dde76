/// What the core needs from the model-streaming collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    TextDelta(String),
    /// A run failure without a message carries nothing to report and is skipped.
    RunFailed { message: Option<String> },
    MessageDone,
}
