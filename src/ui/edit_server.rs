use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};
use crate::config::constants::{
    sleep_duration_millis, EDIT_API_BASE, EDIT_API_ROUTE, EDIT_API_SCOPE, EDIT_API_VERSION,
    SERVER_SHUTDOWN_GRACE_PERIOD_MS, SSE_CACHE_CONTROL, SSE_CONTENT_TYPE,
};
use crate::errors::{RelayError, RelayResult};
use crate::structs::api_error_body::ApiErrorBody;
use crate::structs::config::server_config::ServerConfig;
use crate::structs::config::stream_config::StreamConfig;
use crate::structs::edit_request::EditRequest;
use crate::traits::upstream_provider::UpstreamProvider;
use crate::ui::sse_transport::SseTransport;
use crate::ui::stream_registry::StreamRegistry;
use crate::workers::edit_stream_worker::EditStreamWorker;

/// Shared by every request the server handles.
pub struct EditContext {
    /// `None` when AI is disabled or has no credentials.
    pub provider: Option<Arc<dyn UpstreamProvider>>,
    pub registry: StreamRegistry,
    pub stream_config: StreamConfig,
}

impl EditContext {
    pub fn new(provider: Option<Arc<dyn UpstreamProvider>>, stream_config: StreamConfig) -> Self {
        Self {
            provider,
            registry: StreamRegistry::new(),
            stream_config,
        }
    }
}

pub struct EditServer {
    context: Arc<EditContext>,
    server_config: ServerConfig,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EditServer {
    pub fn new(server_config: ServerConfig, context: EditContext) -> Self {
        Self {
            context: Arc::new(context),
            server_config,
            shutdown_tx: None,
            handle: None,
        }
    }

    pub fn context(&self) -> Arc<EditContext> {
        Arc::clone(&self.context)
    }

    /// Bind and start serving in the background. Returns the bound address.
    pub async fn start(&mut self) -> RelayResult<SocketAddr> {
        let host: IpAddr = self.server_config.host.parse().map_err(|_| {
            RelayError::config_error(
                &format!("Invalid server host: {}", self.server_config.host),
                Some("server.host"),
                Some("Use an IP address such as 127.0.0.1"),
            )
        })?;
        let addr = SocketAddr::new(host, self.server_config.port);

        let cors = warp::cors()
            .allow_origins(self.server_config.cors_origins.iter().map(String::as_str))
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST"]);

        let routes = routes(Arc::clone(&self.context), self.server_config.max_request_bytes).with(cors);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (bound, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(addr, async {
                shutdown_rx.await.ok();
            })
            .map_err(|e| RelayError::system_error("bind", &e.to_string()))?;

        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(tokio::spawn(server));

        log::info!("🌐 Edit server listening on http://{}", bound);
        Ok(bound)
    }

    pub async fn shutdown(&mut self) -> RelayResult<()> {
        log::info!("🛑 Shutting down edit server ({} active streams)...", self.context.registry.active_count());

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx
                .send(())
                .map_err(|_| RelayError::system_error("shutdown", "Failed to send shutdown signal"))?;
        }

        tokio::time::sleep(sleep_duration_millis(SERVER_SHUTDOWN_GRACE_PERIOD_MS)).await;
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                log::debug!("⏳ Open streams still draining; detaching server task");
            }
        }

        log::info!("✅ Edit server shutdown complete");
        Ok(())
    }
}

/// `POST /_api/v3/openai/edit` and its health probe.
pub fn routes(
    context: Arc<EditContext>,
    max_request_bytes: u64,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let context_filter = warp::any().map(move || Arc::clone(&context));

    let base = warp::path(EDIT_API_BASE)
        .and(warp::path(EDIT_API_VERSION))
        .and(warp::path(EDIT_API_SCOPE))
        .and(warp::path(EDIT_API_ROUTE));

    let edit = base
        .clone()
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_request_bytes))
        .and(warp::body::bytes())
        .and(context_filter.clone())
        .and_then(edit_handler);

    let health = base
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(warp::get())
        .and(context_filter)
        .and_then(health_handler);

    edit.or(health).unify()
}

async fn edit_handler(body: Bytes, context: Arc<EditContext>) -> Result<Response, Infallible> {
    let Some(provider) = context.provider.clone() else {
        return Ok(error_response(&RelayError::service_disabled("no AI provider is configured")));
    };

    let request = match serde_json::from_slice::<Value>(&body)
        .map_err(|e| RelayError::validation_error("body", &format!("body must be valid JSON: {}", e)))
        .and_then(|value| EditRequest::from_value(&value))
    {
        Ok(request) => request,
        Err(e) => return Ok(error_response(&e)),
    };

    let thread_id = match request.validate() {
        Ok(thread_id) => thread_id.to_string(),
        Err(e) => {
            log::warn!("⚠️ Rejected edit request: {}", e);
            return Ok(error_response(&e));
        }
    };

    let guard = context.registry.register(&thread_id);
    let worker = EditStreamWorker::new(guard.session_id(), context.stream_config.clone());
    let (transport, receiver) = SseTransport::channel();

    tokio::spawn(async move {
        let _guard = guard;
        worker.run(provider, request, transport).await;
    });

    Ok(sse_response(receiver))
}

async fn health_handler(context: Arc<EditContext>) -> Result<Response, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "ok",
        "activeStreams": context.registry.active_count(),
    }))
    .into_response())
}

fn sse_response(receiver: tokio::sync::mpsc::UnboundedReceiver<Bytes>) -> Response {
    let mut response = Response::new(Body::wrap_stream(SseTransport::body_stream(receiver)));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(SSE_CONTENT_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(SSE_CACHE_CONTROL));
    response
}

fn error_response(error: &RelayError) -> Response {
    let status = StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&ApiErrorBody::from(error)), status).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_responses_carry_status_and_code() {
        let response = error_response(&RelayError::UpstreamThreadMissing);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(&RelayError::service_disabled("off"));
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn sse_response_sets_stream_headers() {
        let (_transport, receiver) = SseTransport::channel();
        let response = sse_response(receiver);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], SSE_CONTENT_TYPE);
        assert_eq!(response.headers()[CACHE_CONTROL], SSE_CACHE_CONTROL);
    }
}
