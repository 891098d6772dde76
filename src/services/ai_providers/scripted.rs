use async_trait::async_trait;
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::upstream_event::UpstreamEvent;
use crate::structs::edit_request::EditRequest;
use crate::traits::upstream_provider::{UpstreamProvider, UpstreamStream};

/// Plays back a fixed list of upstream events. Backs `replay` and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    events: Vec<Result<UpstreamEvent, AiProviderError>>,
    open_error: Option<AiProviderError>,
}

impl ScriptedProvider {
    pub fn new(events: Vec<UpstreamEvent>) -> Self {
        Self {
            events: events.into_iter().map(Ok).collect(),
            open_error: None,
        }
    }

    /// Split `document` into text deltas of `chunk_size` characters, then
    /// signal completion.
    pub fn from_document(document: &str, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chars: Vec<char> = document.chars().collect();

        let mut events: Vec<UpstreamEvent> = chars
            .chunks(chunk_size)
            .map(|chunk| UpstreamEvent::TextDelta(chunk.iter().collect()))
            .collect();
        events.push(UpstreamEvent::MessageDone);

        Self::new(events)
    }

    /// Fail every `open_stream` call with `error`.
    pub fn failing(error: AiProviderError) -> Self {
        Self {
            events: Vec::new(),
            open_error: Some(error),
        }
    }

    /// Append a mid-stream error after the scripted events.
    pub fn with_stream_error(mut self, error: AiProviderError) -> Self {
        self.events.push(Err(error));
        self
    }

    pub fn events(&self) -> &[Result<UpstreamEvent, AiProviderError>] {
        &self.events
    }
}

#[async_trait]
impl UpstreamProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn open_stream(&self, _request: &EditRequest) -> Result<UpstreamStream, AiProviderError> {
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }
        Ok(Box::pin(futures::stream::iter(self.events.clone())))
    }
}
