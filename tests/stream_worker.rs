use std::time::Duration;
use bytes::Bytes;
use editor_assistant_relay::enums::ai_provider_error::AiProviderError;
use editor_assistant_relay::enums::delta_op::DeltaOp;
use editor_assistant_relay::enums::sse_event::SseEvent;
use editor_assistant_relay::enums::stream_error_code::StreamErrorCode;
use editor_assistant_relay::enums::stream_outcome::StreamOutcome;
use editor_assistant_relay::enums::upstream_event::UpstreamEvent;
use editor_assistant_relay::structs::config::stream_config::StreamConfig;
use editor_assistant_relay::structs::stream_summary::StreamSummary;
use editor_assistant_relay::traits::upstream_provider::UpstreamStream;
use editor_assistant_relay::ui::sse_transport::SseTransport;
use editor_assistant_relay::workers::edit_stream_worker::EditStreamWorker;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

type UpstreamSender = UnboundedSender<Result<UpstreamEvent, AiProviderError>>;

fn upstream() -> (UpstreamSender, UpstreamStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|event| (event, rx)) });
    (tx, Box::pin(stream))
}

fn spawn_worker(config: StreamConfig) -> (UpstreamSender, UnboundedReceiver<Bytes>, JoinHandle<StreamSummary>) {
    let (tx, stream) = upstream();
    let (transport, body) = SseTransport::channel();
    let handle = tokio::spawn(async move { EditStreamWorker::new("it", config).drive(stream, transport).await });
    (tx, body, handle)
}

fn text(chunk: &str) -> Result<UpstreamEvent, AiProviderError> {
    Ok(UpstreamEvent::TextDelta(chunk.to_string()))
}

async fn next_frame(body: &mut UnboundedReceiver<Bytes>) -> Option<String> {
    tokio::time::timeout(Duration::from_secs(5), body.recv())
        .await
        .expect("frame within timeout")
        .map(|frame| String::from_utf8(frame.to_vec()).unwrap())
}

fn decode(frame: &str) -> SseEvent {
    let payload = frame
        .strip_prefix("data: ")
        .and_then(|rest| rest.strip_suffix("\n\n"))
        .expect("data frame");
    serde_json::from_str(payload).unwrap()
}

#[tokio::test]
async fn scenario_chunks_stream_as_exact_frames() {
    let (tx, mut body, handle) = spawn_worker(StreamConfig::default());

    for chunk in [r#"{"content"#, r#"s":[{"message":"Hi "#, r#"there"},{"retain":5}"#, r#",{"insert":"X"}]}"#] {
        tx.send(text(chunk)).unwrap();
    }
    tx.send(Ok(UpstreamEvent::MessageDone)).unwrap();

    let mut frames = Vec::new();
    while let Some(frame) = next_frame(&mut body).await {
        frames.push(frame);
    }

    assert_eq!(
        frames,
        vec![
            "data: {\"appendedMessage\":\"Hi there\"}\n\n".to_string(),
            "data: {\"diff\":{\"retain\":5}}\n\n".to_string(),
            "data: {\"diff\":{\"insert\":\"X\"}}\n\n".to_string(),
            "data: {\"finalized\":{\"message\":\"Hi there\",\"replacements\":[{\"retain\":5},{\"insert\":\"X\"}]}}\n\n"
                .to_string(),
        ]
    );
    assert_eq!(handle.await.unwrap().outcome, StreamOutcome::Completed);
}

#[tokio::test]
async fn client_disconnect_stops_processing() {
    let (tx, mut body, handle) = spawn_worker(StreamConfig::default());

    tx.send(text(r#"{"contents":[{"message":"one"},{"retain":1},"#)).unwrap();
    assert_eq!(decode(&next_frame(&mut body).await.unwrap()), SseEvent::appended_message("one"));
    assert_eq!(decode(&next_frame(&mut body).await.unwrap()), SseEvent::detected_diff(&DeltaOp::Retain(1)));

    drop(body);
    // ignored once the client is gone
    let _ = tx.send(text(r#"{"delete":4},{"message":"two"}]}"#));
    let _ = tx.send(Ok(UpstreamEvent::MessageDone));

    let summary = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    assert_eq!(summary.outcome, StreamOutcome::ClientDisconnected);
    assert_eq!(summary.elements, 2);
}

#[tokio::test]
async fn run_failure_writes_one_error_and_ends() {
    let (tx, mut body, handle) = spawn_worker(StreamConfig::default());

    tx.send(text(r#"{"contents":[{"message":"Working on it"},"#)).unwrap();
    tx.send(Ok(UpstreamEvent::RunFailed {
        message: Some("Rate limit reached for requests".into()),
    }))
    .unwrap();
    let _ = tx.send(text(r#"{"retain":3}]}"#));

    let mut events = Vec::new();
    while let Some(frame) = next_frame(&mut body).await {
        events.push(decode(&frame));
    }

    assert_eq!(
        events,
        vec![
            SseEvent::appended_message("Working on it"),
            SseEvent::error("Rate limit reached for requests", StreamErrorCode::RateLimited),
        ]
    );
    assert_eq!(handle.await.unwrap().outcome, StreamOutcome::RunFailed);
}

#[tokio::test]
async fn idle_upstream_is_closed_with_transport_error() {
    let config = StreamConfig {
        idle_timeout_secs: 1,
        keep_alive_secs: 0,
        ..StreamConfig::default()
    };
    let (tx, mut body, handle) = spawn_worker(config);
    tx.send(text(r#"{"contents":["#)).unwrap();

    let frame = next_frame(&mut body).await.unwrap();
    assert!(matches!(
        decode(&frame),
        SseEvent::Error { error_code: StreamErrorCode::TransportError, .. }
    ));
    assert!(next_frame(&mut body).await.is_none());

    assert_eq!(handle.await.unwrap().outcome, StreamOutcome::IdleTimeout);
    drop(tx);
}

#[tokio::test]
async fn keep_alive_does_not_postpone_the_idle_timeout() {
    let config = StreamConfig {
        idle_timeout_secs: 2,
        keep_alive_secs: 1,
        ..StreamConfig::default()
    };
    let (tx, mut body, handle) = spawn_worker(config);
    tx.send(text(r#"{"contents":[{"message":"Hi"},"#)).unwrap();

    let frames = tokio::time::timeout(Duration::from_secs(10), async {
        let mut frames = Vec::new();
        while let Some(frame) = next_frame(&mut body).await {
            frames.push(frame);
        }
        frames
    })
    .await
    .expect("idle timeout should end the stream despite keep-alives");

    assert_eq!(decode(&frames[0]), SseEvent::appended_message("Hi"));
    assert!(frames.iter().any(|frame| frame == ": keep-alive\n\n"));
    assert!(matches!(
        frames.last().map(|frame| decode(frame)),
        Some(SseEvent::Error { error_code: StreamErrorCode::TransportError, .. })
    ));

    assert_eq!(handle.await.unwrap().outcome, StreamOutcome::IdleTimeout);
    drop(tx);
}

#[tokio::test]
async fn keep_alive_comments_are_sent_while_waiting() {
    let config = StreamConfig {
        idle_timeout_secs: 5,
        keep_alive_secs: 1,
        ..StreamConfig::default()
    };
    let (tx, mut body, handle) = spawn_worker(config);

    assert_eq!(next_frame(&mut body).await.unwrap(), ": keep-alive\n\n");

    tx.send(text(r#"{"contents":[]}"#)).unwrap();
    tx.send(Ok(UpstreamEvent::MessageDone)).unwrap();

    let mut last = None;
    while let Some(frame) = next_frame(&mut body).await {
        last = Some(frame);
    }
    assert_eq!(last.map(|frame| decode(&frame)), Some(SseEvent::finalized("", &[])));
    assert_eq!(handle.await.unwrap().outcome, StreamOutcome::Completed);
}
