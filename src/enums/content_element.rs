use serde_json::Value;
use crate::enums::delta_op::DeltaOp;

/// Canonical form of one element of the `contents` array.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentElement {
    MessageFragment { text: String },
    Delta(DeltaOp),
    /// Anything the classifier does not recognise, kept verbatim.
    Opaque(Value),
}

impl ContentElement {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }
}
