use std::sync::Arc;
use editor_assistant_relay::services::ai_providers::scripted::ScriptedProvider;
use editor_assistant_relay::structs::config::stream_config::StreamConfig;
use editor_assistant_relay::traits::upstream_provider::UpstreamProvider;
use editor_assistant_relay::ui::edit_server::{routes, EditContext};
use serde_json::{json, Value};
use warp::http::StatusCode;

const EDIT_PATH: &str = "/_api/v3/openai/edit";
const DOCUMENT: &str = r##"{"contents":[{"message":"Fixed the heading"},{"retain":2},{"insert":"#"}]}"##;

fn context(provider: Option<Arc<dyn UpstreamProvider>>) -> Arc<EditContext> {
    Arc::new(EditContext::new(provider, StreamConfig::default()))
}

fn scripted() -> Option<Arc<dyn UpstreamProvider>> {
    Some(Arc::new(ScriptedProvider::from_document(DOCUMENT, 6)))
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn streams_sse_frames_for_a_valid_request() {
    let filter = routes(context(scripted()), 1024 * 1024);

    let response = warp::test::request()
        .method("POST")
        .path(EDIT_PATH)
        .json(&json!({ "userMessage": "Make it a heading", "markdown": "# Title", "threadId": "thread_1" }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream;charset=utf-8");
    assert_eq!(response.headers()["cache-control"], "no-cache, no-transform");

    let body = String::from_utf8(response.body().to_vec()).unwrap();
    let frames: Vec<&str> = body.split_terminator("\n\n").collect();
    assert_eq!(
        frames,
        vec![
            r#"data: {"appendedMessage":"Fixed the heading"}"#,
            r#"data: {"diff":{"retain":2}}"#,
            r##"data: {"diff":{"insert":"#"}}"##,
            r##"data: {"finalized":{"message":"Fixed the heading","replacements":[{"retain":2},{"insert":"#"}]}}"##,
        ]
    );
}

#[tokio::test]
async fn missing_thread_id_is_rejected_before_streaming() {
    let filter = routes(context(scripted()), 1024 * 1024);

    let response = warp::test::request()
        .method("POST")
        .path(EDIT_PATH)
        .json(&json!({ "userMessage": "Fix it", "markdown": "text" }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response.body()),
        json!({ "errors": [{ "message": "threadId is not set", "code": "thread-id-is-not-set" }] })
    );
}

#[tokio::test]
async fn invalid_fields_are_rejected() {
    let filter = routes(context(scripted()), 1024 * 1024);

    let response = warp::test::request()
        .method("POST")
        .path(EDIT_PATH)
        .json(&json!({ "userMessage": "", "markdown": "text", "threadId": "t" }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response.body()),
        json!({ "errors": [{ "message": "userMessage must be set", "code": "invalid-request" }] })
    );

    let response = warp::test::request()
        .method("POST")
        .path(EDIT_PATH)
        .body("{not json")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn disabled_ai_answers_not_implemented() {
    let filter = routes(context(None), 1024 * 1024);

    let response = warp::test::request()
        .method("POST")
        .path(EDIT_PATH)
        .json(&json!({ "userMessage": "Fix it", "markdown": "text", "threadId": "t" }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        json_body(response.body()),
        json!({ "errors": [{ "message": "AI is not enabled", "code": "ai-service-disabled" }] })
    );
}

#[tokio::test]
async fn health_reports_active_streams() {
    let context = context(scripted());
    let filter = routes(Arc::clone(&context), 1024 * 1024);
    let _guard = context.registry.register("thread_1");

    let response = warp::test::request()
        .method("GET")
        .path("/_api/v3/openai/edit/health")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response.body()), json!({ "status": "ok", "activeStreams": 1 }));
}
