use std::convert::Infallible;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use crate::enums::delta_op::DeltaOp;
use crate::enums::sse_event::SseEvent;
use crate::enums::stream_error_code::StreamErrorCode;
use crate::errors::{RelayError, RelayResult};
use crate::traits::event_sink::ReconcilerSink;

/// Writes SSE frames for one HTTP response.
///
/// Frames go through an unbounded channel whose receiver is the response
/// body, so writes keep their call order. Dropping the body (client gone)
/// closes the channel; `end` drops the sender, which finishes the body.
pub struct SseTransport {
    sender: Option<UnboundedSender<Bytes>>,
    frames_written: usize,
}

impl SseTransport {
    pub fn new(sender: UnboundedSender<Bytes>) -> Self {
        Self {
            sender: Some(sender),
            frames_written: 0,
        }
    }

    pub fn channel() -> (Self, UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Response body fed by the receiving half of [`Self::channel`].
    pub fn body_stream(receiver: UnboundedReceiver<Bytes>) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|frame| (Ok(frame), receiver))
        })
    }

    /// `data: <json>\n\n`
    pub fn frame(event: &SseEvent) -> RelayResult<String> {
        let payload = serde_json::to_string(event)?;
        Ok(format!("data: {}\n\n", payload))
    }

    pub fn write_data(&mut self, event: &SseEvent) -> RelayResult<()> {
        let frame = Self::frame(event)?;
        self.write_raw(frame, event.name())
    }

    pub fn write_error(&mut self, message: &str, code: StreamErrorCode) -> RelayResult<()> {
        self.write_data(&SseEvent::error(message, code))
    }

    /// Comment frame, ignored by SSE clients. Used for keep-alive.
    pub fn write_comment(&mut self, comment: &str) -> RelayResult<()> {
        self.write_raw(format!(": {}\n\n", comment), "comment")
    }

    /// Finish the response. Further writes fail.
    pub fn end(&mut self) {
        if self.sender.take().is_some() {
            log::debug!("📪 SSE stream ended after {} frames", self.frames_written);
        }
    }

    pub fn is_ended(&self) -> bool {
        self.sender.is_none()
    }

    /// The reader is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().map_or(true, UnboundedSender::is_closed)
    }

    /// Resolves once the reader drops the body. Never resolves after `end`.
    pub async fn closed(&self) {
        match &self.sender {
            Some(sender) => sender.closed().await,
            None => std::future::pending::<()>().await,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    fn write_raw(&mut self, frame: String, kind: &str) -> RelayResult<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| RelayError::transport_error(kind, "write after end"))?;

        sender
            .send(Bytes::from(frame))
            .map_err(|_| RelayError::transport_error(kind, "client connection closed"))?;

        self.frames_written += 1;
        Ok(())
    }

    fn emit(&mut self, event: &SseEvent) {
        if let Err(e) = self.write_data(event) {
            log::debug!("📭 Dropped {} frame: {}", event.name(), e);
        }
    }
}

impl ReconcilerSink for SseTransport {
    fn on_message(&mut self, text: &str) {
        self.emit(&SseEvent::appended_message(text));
    }

    fn on_diff(&mut self, op: &DeltaOp) {
        self.emit(&SseEvent::detected_diff(op));
    }

    fn on_final(&mut self, message: &str, replacements: &[DeltaOp]) {
        self.emit(&SseEvent::finalized(message, replacements));
    }

    fn on_unrecognized(&mut self, element: &Value) {
        log::debug!("🔎 Not forwarding unrecognised element {}", element);
    }

    fn on_malformed(&mut self, error: &RelayError) {
        log::debug!("🔎 Not forwarding {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn drain(rx: &mut UnboundedReceiver<Bytes>) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(String::from_utf8(frame.to_vec()).unwrap());
        }
        frames
    }

    #[test]
    fn writes_data_frames_in_call_order() {
        let (mut transport, mut rx) = SseTransport::channel();
        assert_ok!(transport.write_data(&SseEvent::appended_message("Hi")));
        assert_ok!(transport.write_data(&SseEvent::detected_diff(&DeltaOp::Retain(5))));
        assert_ok!(transport.write_error("quota", StreamErrorCode::BudgetExceeded));

        assert_eq!(
            drain(&mut rx),
            vec![
                "data: {\"appendedMessage\":\"Hi\"}\n\n".to_string(),
                "data: {\"diff\":{\"retain\":5}}\n\n".to_string(),
                "data: {\"errorMessage\":\"quota\",\"errorCode\":\"budget-exceeded\"}\n\n".to_string(),
            ]
        );
        assert_eq!(transport.frames_written(), 3);
    }

    #[test]
    fn end_is_idempotent_and_blocks_writes() {
        let (mut transport, mut rx) = SseTransport::channel();
        transport.end();
        transport.end();

        assert!(transport.is_ended());
        assert_err!(transport.write_data(&SseEvent::appended_message("late")));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn detects_dropped_reader() {
        let (mut transport, rx) = SseTransport::channel();
        assert!(!transport.is_closed());
        drop(rx);

        assert!(transport.is_closed());
        assert_err!(transport.write_comment("keep-alive"));
    }

    #[tokio::test]
    async fn closed_resolves_when_body_is_dropped() {
        let (transport, rx) = SseTransport::channel();
        drop(rx);
        tokio::time::timeout(std::time::Duration::from_secs(1), transport.closed())
            .await
            .expect("closed() should resolve");
    }

    #[tokio::test]
    async fn body_stream_finishes_after_end() {
        use futures::StreamExt;

        let (mut transport, rx) = SseTransport::channel();
        transport.write_comment("keep-alive").unwrap();
        transport.end();

        let frames: Vec<_> = SseTransport::body_stream(rx).collect().await;
        assert_eq!(frames.len(), 1);
    }
}
