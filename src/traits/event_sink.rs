use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use crate::enums::delta_op::DeltaOp;
use crate::enums::sse_event::SseEvent;
use crate::errors::RelayError;

/// Receiver of reconciler output.
///
/// Messages are cumulative: every call carries the full text so far and
/// supersedes the previous one. Diffs are delta-only and must be replayed in
/// arrival order.
pub trait ReconcilerSink {
    fn on_message(&mut self, text: &str);

    fn on_diff(&mut self, op: &DeltaOp);

    fn on_final(&mut self, message: &str, replacements: &[DeltaOp]);

    fn on_unrecognized(&mut self, _element: &Value) {}

    fn on_malformed(&mut self, _error: &RelayError) {}
}

/// Collects events in memory.
impl ReconcilerSink for Vec<SseEvent> {
    fn on_message(&mut self, text: &str) {
        self.push(SseEvent::appended_message(text));
    }

    fn on_diff(&mut self, op: &DeltaOp) {
        self.push(SseEvent::detected_diff(op));
    }

    fn on_final(&mut self, message: &str, replacements: &[DeltaOp]) {
        self.push(SseEvent::finalized(message, replacements));
    }
}

/// Forwards events to a channel; a dropped receiver is ignored.
impl ReconcilerSink for UnboundedSender<SseEvent> {
    fn on_message(&mut self, text: &str) {
        let _ = self.send(SseEvent::appended_message(text));
    }

    fn on_diff(&mut self, op: &DeltaOp) {
        let _ = self.send(SseEvent::detected_diff(op));
    }

    fn on_final(&mut self, message: &str, replacements: &[DeltaOp]) {
        let _ = self.send(SseEvent::finalized(message, replacements));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stream_reconciler::StreamReconciler;

    #[test]
    fn channel_sink_forwards_and_tolerates_a_dropped_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut reconciler = StreamReconciler::new(tx);
        let buffer = r#"{"contents":[{"message":"a"},{"delete":1}]}"#;

        reconciler.process("", buffer);
        assert_eq!(rx.try_recv().unwrap(), SseEvent::appended_message("a"));
        assert_eq!(rx.try_recv().unwrap(), SseEvent::detected_diff(&DeltaOp::Delete(1)));

        drop(rx);
        assert!(reconciler.send_final_result(buffer).is_some());
    }
}
