use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::upstream_event::UpstreamEvent;
use crate::structs::edit_request::EditRequest;

pub type UpstreamStream = Pin<Box<dyn Stream<Item = Result<UpstreamEvent, AiProviderError>> + Send>>;

#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Start a model run for `request`. Errors here happen before any text
    /// has been produced.
    async fn open_stream(&self, request: &EditRequest) -> Result<UpstreamStream, AiProviderError>;
}
