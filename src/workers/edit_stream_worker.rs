use std::sync::Arc;
use futures::StreamExt;
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior};
use crate::config::constants::SSE_KEEP_ALIVE_COMMENT;
use crate::enums::stream_error_code::StreamErrorCode;
use crate::enums::stream_outcome::StreamOutcome;
use crate::enums::upstream_event::UpstreamEvent;
use crate::errors::RelayError;
use crate::logger::stream_logger::StreamLogger;
use crate::services::stream_error_codes::map_stream_error_code;
use crate::services::stream_reconciler::StreamReconciler;
use crate::structs::config::stream_config::StreamConfig;
use crate::structs::edit_request::EditRequest;
use crate::structs::stream_summary::StreamSummary;
use crate::traits::upstream_provider::{UpstreamProvider, UpstreamStream};
use crate::ui::sse_transport::SseTransport;

/// Pumps one upstream run through a reconciler into an SSE response.
///
/// The reconciler is destroyed exactly once and the transport is ended on
/// every exit path.
pub struct EditStreamWorker {
    logger: StreamLogger,
    config: StreamConfig,
}

impl EditStreamWorker {
    pub fn new(session_id: &str, config: StreamConfig) -> Self {
        Self {
            logger: StreamLogger::new(session_id),
            config,
        }
    }

    pub fn session_id(&self) -> &str {
        self.logger.session_id()
    }

    /// Open the upstream run for `request` and stream it to `transport`.
    pub async fn run(
        &self,
        provider: Arc<dyn UpstreamProvider>,
        request: EditRequest,
        mut transport: SseTransport,
    ) -> StreamSummary {
        let thread_id = request.thread_id.clone().unwrap_or_default();

        let opened = tokio::select! {
            biased;
            _ = transport.closed() => None,
            result = provider.open_stream(&request) => Some(result),
        };

        match opened {
            Some(Ok(upstream)) => {
                self.logger.log_opened(provider.name(), &thread_id);
                self.drive(upstream, transport).await
            }
            Some(Err(error)) => {
                log::error!("❌ [{}] Failed to open upstream run: {}", self.session_id(), error);
                let outcome = if error.is_run_failure() {
                    StreamOutcome::RunFailed
                } else {
                    StreamOutcome::TransportFailed
                };

                if let Err(e) = transport.write_error(&error.to_string(), error.stream_error_code()) {
                    log::debug!("📭 [{}] Could not report open failure: {}", self.session_id(), e);
                }
                transport.end();
                self.finish(outcome, 0, 0)
            }
            None => {
                transport.end();
                self.finish(StreamOutcome::ClientDisconnected, 0, 0)
            }
        }
    }

    /// Consume `upstream` until it completes, fails, idles out or the client
    /// goes away.
    pub async fn drive(&self, mut upstream: UpstreamStream, transport: SseTransport) -> StreamSummary {
        let mut reconciler = StreamReconciler::new(transport);
        let mut buffer = String::new();
        let idle_timeout = self.config.idle_timeout();
        let mut keep_alive = self.config.keep_alive_interval().map(|period| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        // One deadline for the whole run; only upstream activity pushes it back.
        let idle = sleep(idle_timeout);
        tokio::pin!(idle);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = reconciler.sink().closed() => {
                    self.report_failure(&mut reconciler, &RelayError::ClientDisconnected);
                    break StreamOutcome::ClientDisconnected;
                }
                _ = Self::tick(&mut keep_alive) => {
                    if let Err(e) = reconciler.sink_mut().write_comment(SSE_KEEP_ALIVE_COMMENT) {
                        log::debug!("📭 [{}] Keep-alive not delivered: {}", self.session_id(), e);
                    }
                }
                event = upstream.next() => {
                    idle.as_mut().reset(Instant::now() + idle_timeout);

                    match event {
                        Some(Ok(UpstreamEvent::TextDelta(text))) => {
                            if buffer.len() + text.len() > self.config.max_buffer_bytes {
                                let reason = format!("Response exceeded {} bytes", self.config.max_buffer_bytes);
                                self.report_failure(&mut reconciler, &RelayError::transport_error("buffer", &reason));
                                break StreamOutcome::BufferLimitExceeded;
                            }

                            let surfaced = reconciler.process(&buffer, &text);
                            buffer.push_str(&text);
                            self.logger.log_chunk(text.len(), surfaced);
                        }
                        Some(Ok(UpstreamEvent::MessageDone)) => {
                            self.finalize(&mut reconciler, &buffer);
                            break StreamOutcome::Completed;
                        }
                        Some(Ok(UpstreamEvent::RunFailed { message: Some(message) })) => {
                            let error = RelayError::run_failed(&message, map_stream_error_code(&message));
                            self.report_failure(&mut reconciler, &error);
                            break StreamOutcome::RunFailed;
                        }
                        Some(Ok(UpstreamEvent::RunFailed { message: None })) => {
                            log::debug!("⏭️ [{}] Skipping run failure without a message", self.session_id());
                        }
                        Some(Err(error)) => {
                            let outcome = if error.is_run_failure() {
                                StreamOutcome::RunFailed
                            } else {
                                StreamOutcome::TransportFailed
                            };
                            self.report_failure(&mut reconciler, &RelayError::from(error));
                            break outcome;
                        }
                        None => {
                            log::debug!("🏁 [{}] Upstream ended without a completion event", self.session_id());
                            self.finalize(&mut reconciler, &buffer);
                            break StreamOutcome::Completed;
                        }
                    }
                }
                _ = &mut idle => {
                    let reason = format!("No data from the AI service for {} seconds", idle_timeout.as_secs());
                    self.report_failure(&mut reconciler, &RelayError::transport_error("upstream read", &reason));
                    break StreamOutcome::IdleTimeout;
                }
            }
        };

        let elements = reconciler.session().emitted_count;
        reconciler.destroy();
        let mut transport = reconciler.into_sink();
        transport.end();

        self.finish(outcome, elements, buffer.len())
    }

    fn finalize(&self, reconciler: &mut StreamReconciler<SseTransport>, buffer: &str) {
        if let Some(report) = reconciler.send_final_result(buffer) {
            self.logger.log_finalized(&report);
        }
    }

    /// Fail the session and tell the client why. Recoverable errors are only
    /// logged.
    fn report_failure(&self, reconciler: &mut StreamReconciler<SseTransport>, error: &RelayError) {
        if error.is_recoverable() {
            log::info!("🔌 [{}] {}", self.session_id(), error);
            return;
        }

        log::error!("❌ [{}] [{}] {}", self.session_id(), error.severity().name(), error);
        reconciler.fail();
        if let Err(e) = reconciler.sink_mut().write_error(&error.client_message(), error.stream_error_code()) {
            log::debug!("📭 [{}] Error frame not delivered: {}", self.session_id(), e);
        }
    }

    async fn tick(interval: &mut Option<Interval>) {
        match interval {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    fn finish(&self, outcome: StreamOutcome, elements: usize, buffered_bytes: usize) -> StreamSummary {
        let summary = StreamSummary {
            outcome,
            elements,
            buffered_bytes,
        };
        self.logger.log_finished(&summary);
        summary
    }
}
