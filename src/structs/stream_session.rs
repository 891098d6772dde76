use crate::enums::delta_op::DeltaOp;

/// Per-request state owned by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSession {
    pub raw_buffer: String,
    pub emitted_count: usize,
    pub malformed_count: usize,
    pub opaque_count: usize,
    /// Concatenation of every message fragment seen so far.
    pub message: String,
    pub pending_diffs: Vec<DeltaOp>,
    pub is_finalized: bool,
}

impl StreamSession {
    /// Bring `raw_buffer` to `previous + chunk` without copying when the
    /// caller's `previous` is what we already hold. Returns `true` when the
    /// buffer had to be rebuilt from the caller's copy.
    pub fn sync_buffer(&mut self, previous: &str, chunk: &str) -> bool {
        if self.raw_buffer == previous {
            self.raw_buffer.push_str(chunk);
            return false;
        }

        let already_appended = self.raw_buffer.len() == previous.len() + chunk.len()
            && self.raw_buffer.starts_with(previous)
            && self.raw_buffer.ends_with(chunk);
        if already_appended {
            return false;
        }

        log::debug!("🔁 Caller buffer diverged from session buffer, resynchronising");
        self.raw_buffer.clear();
        self.raw_buffer.push_str(previous);
        self.raw_buffer.push_str(chunk);
        true
    }

    /// Replace `raw_buffer` with `final_buffer` when it carries more. Returns
    /// `true` when the held buffer was not a prefix of it.
    pub fn adopt_final(&mut self, final_buffer: &str) -> bool {
        if final_buffer.len() < self.raw_buffer.len() {
            return false;
        }
        if final_buffer.starts_with(self.raw_buffer.as_str()) {
            let held = self.raw_buffer.len();
            self.raw_buffer.push_str(&final_buffer[held..]);
            return false;
        }

        log::debug!("🔁 Final buffer diverged from session buffer, resynchronising");
        self.raw_buffer = final_buffer.to_string();
        true
    }

    pub fn release(&mut self) {
        self.raw_buffer = String::new();
        self.message = String::new();
        self.pending_diffs = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_appends_in_place_and_tolerates_replays() {
        let mut session = StreamSession::default();
        assert!(!session.sync_buffer("", "{\"con"));
        assert!(!session.sync_buffer("{\"con", "tents\""));
        assert_eq!(session.raw_buffer, "{\"contents\"");

        assert!(!session.sync_buffer("{\"con", "tents\""));
        assert_eq!(session.raw_buffer, "{\"contents\"");
    }

    #[test]
    fn sync_rebuilds_on_divergence() {
        let mut session = StreamSession::default();
        session.sync_buffer("", "abc");
        assert!(session.sync_buffer("xyz", "!"));
        assert_eq!(session.raw_buffer, "xyz!");
    }

    #[test]
    fn final_buffer_extends_or_replaces() {
        let mut session = StreamSession::default();
        session.sync_buffer("", "abc");
        assert!(!session.adopt_final("abcdef"));
        assert_eq!(session.raw_buffer, "abcdef");

        assert!(!session.adopt_final("abc"));
        assert_eq!(session.raw_buffer, "abcdef");

        assert!(session.adopt_final("xyzxyzxyz"));
        assert_eq!(session.raw_buffer, "xyzxyzxyz");
    }
}
