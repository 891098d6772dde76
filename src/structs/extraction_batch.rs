use crate::structs::extracted_element::ExtractedElement;

/// Result of one `try_extract_new_elements` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionBatch {
    pub elements: Vec<ExtractedElement>,
    /// `previous + chunk`, to be passed as `previous` next time.
    pub buffer: String,
}
