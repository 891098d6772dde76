use std::fmt;
use serde::{Deserialize, Serialize};

/// One positional edit against the target document, in Quill delta form.
///
/// Serializes as `{"retain": n}`, `{"delete": n}` or `{"insert": "text"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaOp {
    Retain(u64),
    Delete(u64),
    Insert(String),
}

impl DeltaOp {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Retain(_) => "retain",
            Self::Delete(_) => "delete",
            Self::Insert(_) => "insert",
        }
    }
}

impl fmt::Display for DeltaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain(count) | Self::Delete(count) => write!(f, "{}({})", self.kind(), count),
            Self::Insert(text) => write!(f, "{}({} chars)", self.kind(), text.chars().count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_single_key_object_shape() {
        assert_eq!(serde_json::to_value(DeltaOp::Retain(5)).unwrap(), json!({"retain": 5}));
        assert_eq!(serde_json::to_value(DeltaOp::Delete(2)).unwrap(), json!({"delete": 2}));
        assert_eq!(serde_json::to_value(DeltaOp::Insert("X".into())).unwrap(), json!({"insert": "X"}));
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(serde_json::from_value::<DeltaOp>(json!({"retain": -3})).is_err());
    }
}
