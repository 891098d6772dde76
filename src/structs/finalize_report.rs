use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeReport {
    /// Elements that only became available while finalizing.
    pub late_elements: usize,
    pub repaired_trailing: bool,
    pub dropped_trailing: Option<String>,
    pub message_len: usize,
    pub replacements: usize,
    /// Skipped over the whole session, not just while finalizing.
    pub malformed_elements: usize,
    pub opaque_elements: usize,
}

impl FinalizeReport {
    pub fn has_warnings(&self) -> bool {
        self.dropped_trailing.is_some() || self.malformed_elements > 0 || self.opaque_elements > 0
    }
}
