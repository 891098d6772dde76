use crate::enums::content_element::ContentElement;
use crate::enums::session_state::SessionState;
use crate::errors::RelayError;
use crate::services::fragment_parser::FragmentParser;
use crate::services::operation_classifier::OperationClassifier;
use crate::structs::extracted_element::ExtractedElement;
use crate::structs::finalize_report::FinalizeReport;
use crate::structs::stream_session::StreamSession;
use crate::traits::event_sink::ReconcilerSink;

/// Drives the fragment parser over incoming chunks and reports classified
/// elements to its sink.
///
/// One reconciler per request. Chunks must arrive in order; nothing here is
/// shared between requests.
pub struct StreamReconciler<S: ReconcilerSink> {
    sink: S,
    parser: FragmentParser,
    session: StreamSession,
    state: SessionState,
}

impl<S: ReconcilerSink> StreamReconciler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            parser: FragmentParser::new(),
            session: StreamSession::default(),
            state: SessionState::Active,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Handle one chunk. `previous` is everything received before `chunk`.
    /// Returns how many elements were surfaced by this call.
    pub fn process(&mut self, previous: &str, chunk: &str) -> usize {
        if !self.state.accepts_input() {
            log::debug!("⏭️ Ignoring chunk in {:?} state", self.state);
            return 0;
        }

        if self.session.sync_buffer(previous, chunk) {
            self.rescan();
        }

        let elements = self.parser.extract_from(&self.session.raw_buffer);
        let mut count = 0;
        for element in elements {
            if self.dispatch(element, true) {
                count += 1;
            }
        }

        self.record_emitted();
        count
    }

    /// Flush whatever is left in `final_buffer` and report the combined
    /// result once. Later calls are no-ops and return `None`.
    ///
    /// Elements that only complete here are folded into the final result
    /// without individual message/diff callbacks.
    pub fn send_final_result(&mut self, final_buffer: &str) -> Option<FinalizeReport> {
        if !self.state.accepts_input() {
            log::debug!("⏭️ Final result already handled ({:?})", self.state);
            return None;
        }
        self.state = SessionState::Finalizing;

        if self.session.adopt_final(final_buffer) {
            self.rescan();
        }

        let mut report = FinalizeReport::default();
        let elements = self.parser.extract_from(&self.session.raw_buffer);
        for element in elements {
            if self.dispatch(element, false) {
                report.late_elements += 1;
            }
        }

        if let Some(trailing) = self.parser.trailing(&self.session.raw_buffer).map(str::to_string) {
            match self.parser.recover_trailing(&self.session.raw_buffer) {
                Some(element) => {
                    log::debug!("🩹 Recovered truncated trailing element #{}", element.index);
                    report.repaired_trailing = true;
                    report.late_elements += 1;
                    self.dispatch(element, false);
                }
                None => {
                    log::warn!("⚠️ Dropping unparseable trailing content ({} bytes)", trailing.len());
                    report.dropped_trailing = Some(trailing);
                }
            }
        }

        self.record_emitted();
        report.message_len = self.session.message.len();
        report.replacements = self.session.pending_diffs.len();
        report.malformed_elements = self.session.malformed_count;
        report.opaque_elements = self.session.opaque_count;

        self.sink.on_final(&self.session.message, &self.session.pending_diffs);
        self.session.is_finalized = true;
        self.state = SessionState::Finalized;

        Some(report)
    }

    /// Mark the session failed. Only an active or finalizing session can fail.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Errored;
        }
    }

    /// Release session state. Safe to call repeatedly and from any state;
    /// no callback fires afterwards.
    pub fn destroy(&mut self) {
        if self.state == SessionState::Destroyed {
            return;
        }

        log::debug!(
            "🧹 Destroying reconciler session ({:?}, {} elements)",
            self.state,
            self.session.emitted_count
        );
        self.state = SessionState::Destroyed;
        self.session.release();
        self.parser.reset();
    }

    /// The buffer was replaced under the parser. Scan it again from the top;
    /// elements below the old emitted count have already been reported.
    fn rescan(&mut self) {
        log::warn!(
            "⚠️ Buffer diverged after {} elements, rescanning without re-emitting",
            self.session.emitted_count
        );
        self.parser.reset();
    }

    fn record_emitted(&mut self) {
        self.session.emitted_count = self.session.emitted_count.max(self.parser.emitted_count());
    }

    /// Returns `false` for elements already reported before a rescan.
    fn dispatch(&mut self, element: ExtractedElement, notify: bool) -> bool {
        if element.index < self.session.emitted_count {
            return false;
        }

        let value = match element.parsed {
            Ok(value) => value,
            Err(error) => {
                let error = RelayError::from(error);
                log::warn!("⚠️ Skipping {}", error);
                self.session.malformed_count += 1;
                self.sink.on_malformed(&error);
                return true;
            }
        };

        match OperationClassifier::classify(value) {
            ContentElement::MessageFragment { text } => {
                self.session.message.push_str(&text);
                if notify {
                    self.sink.on_message(&self.session.message);
                }
            }
            ContentElement::Delta(op) => {
                if notify {
                    self.sink.on_diff(&op);
                }
                self.session.pending_diffs.push(op);
            }
            ContentElement::Opaque(value) => {
                log::warn!("⚠️ Unrecognised element #{}: {}", element.index, value);
                self.session.opaque_count += 1;
                self.sink.on_unrecognized(&value);
            }
        }
        true
    }
}
