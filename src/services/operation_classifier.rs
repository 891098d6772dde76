use serde_json::Value;
use crate::config::constants::{DELETE_KEY, INSERT_KEY, MESSAGE_KEY, RETAIN_KEY};
use crate::enums::content_element::ContentElement;
use crate::enums::delta_op::DeltaOp;

/// Tags a parsed `contents` element.
///
/// Key precedence is `message`, then `insert > delete > retain`. The first key
/// present decides the kind; if its value has the wrong type (a non-string
/// message or insert, a count that is not a non-negative integer) the whole
/// element is opaque rather than falling through to a lower-precedence key.
pub struct OperationClassifier;

impl OperationClassifier {
    pub fn classify(element: Value) -> ContentElement {
        let Some(object) = element.as_object() else {
            return ContentElement::Opaque(element);
        };

        let classified = if let Some(message) = object.get(MESSAGE_KEY) {
            message
                .as_str()
                .map(|text| ContentElement::MessageFragment { text: text.to_string() })
        } else if let Some(insert) = object.get(INSERT_KEY) {
            insert
                .as_str()
                .map(|text| ContentElement::Delta(DeltaOp::Insert(text.to_string())))
        } else if let Some(delete) = object.get(DELETE_KEY) {
            delete.as_u64().map(|count| ContentElement::Delta(DeltaOp::Delete(count)))
        } else if let Some(retain) = object.get(RETAIN_KEY) {
            retain.as_u64().map(|count| ContentElement::Delta(DeltaOp::Retain(count)))
        } else {
            None
        };

        classified.unwrap_or(ContentElement::Opaque(element))
    }
}
