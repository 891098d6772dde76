use std::time::Instant;
use crate::enums::sse_event::SseEvent;
use crate::structs::finalize_report::FinalizeReport;
use crate::structs::stream_summary::StreamSummary;

/// Per-stream log lines, all tagged with the same session id.
pub struct StreamLogger {
    session_id: String,
    started: Instant,
}

impl StreamLogger {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            started: Instant::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log_opened(&self, provider: &str, thread_id: &str) {
        log::info!("🚀 [{}] Opened {} stream for thread {}", self.session_id, provider, thread_id);
    }

    pub fn log_chunk(&self, chunk_len: usize, surfaced: usize) {
        log::debug!("📥 [{}] Chunk of {} bytes surfaced {} elements", self.session_id, chunk_len, surfaced);
    }

    pub fn log_finalized(&self, report: &FinalizeReport) {
        if report.has_warnings() {
            log::warn!(
                "⚠️ [{}] Finalized with repairs (late: {}, repaired tail: {}, dropped tail: {}, malformed: {}, unrecognised: {})",
                self.session_id,
                report.late_elements,
                report.repaired_trailing,
                report.dropped_trailing.is_some(),
                report.malformed_elements,
                report.opaque_elements
            );
        }
        log::debug!(
            "🧾 [{}] Final message {} bytes, {} replacements",
            self.session_id,
            report.message_len,
            report.replacements
        );
    }

    pub fn log_finished(&self, summary: &StreamSummary) {
        let elapsed = self.started.elapsed();
        let line = format!(
            "{} [{}] Stream {:?} after {:.2?} ({} elements, {} bytes)",
            summary.outcome.emoji(),
            self.session_id,
            summary.outcome,
            elapsed,
            summary.elements,
            summary.buffered_bytes
        );

        if summary.outcome.is_success() {
            log::info!("{}", line);
        } else {
            log::warn!("{}", line);
        }
    }

    /// Human-readable listing of the events a replay produced.
    pub fn print_events(events: &[SseEvent]) {
        println!("\n📡 Stream events:");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for (position, event) in events.iter().enumerate() {
            match event {
                SseEvent::AppendedMessage { appended_message } => {
                    println!("{:>3} 💬 {}", position + 1, appended_message);
                }
                SseEvent::DetectedDiff { diff } => {
                    println!("{:>3} ✏️  {}", position + 1, diff);
                }
                SseEvent::Finalized { finalized } => {
                    println!("{:>3} 🏁 {} replacements", position + 1, finalized.replacements.len());
                }
                SseEvent::Error { error_message, error_code } => {
                    println!("{:>3} ❌ {} ({})", position + 1, error_message, error_code);
                }
            }
        }
    }
}
