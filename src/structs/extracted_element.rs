use serde_json::Value;
use crate::services::fragment_parser::FragmentError;

/// One closed element of the `contents` array as cut from the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedElement {
    /// Position in the `contents` array.
    pub index: usize,
    pub raw: String,
    pub parsed: Result<Value, FragmentError>,
    /// Set when the element was truncated and closed by the trailing repair.
    pub repaired: bool,
}

impl ExtractedElement {
    pub fn is_malformed(&self) -> bool {
        self.parsed.is_err()
    }
}
