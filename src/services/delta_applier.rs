use crate::enums::delta_op::DeltaOp;
use crate::errors::{RelayError, RelayResult};

/// Replays delta operations against a document, in order.
///
/// Counts are in Unicode scalar values. Content after the last operation is
/// kept, as with an implicit trailing retain.
pub struct DeltaApplier;

impl DeltaApplier {
    pub fn apply(document: &str, ops: &[DeltaOp]) -> RelayResult<String> {
        let mut remaining = document.chars();
        let mut output = String::with_capacity(document.len());

        for (position, op) in ops.iter().enumerate() {
            match op {
                DeltaOp::Retain(count) => {
                    for _ in 0..*count {
                        let c = remaining.next().ok_or_else(|| Self::overrun(position, op))?;
                        output.push(c);
                    }
                }
                DeltaOp::Delete(count) => {
                    for _ in 0..*count {
                        remaining.next().ok_or_else(|| Self::overrun(position, op))?;
                    }
                }
                DeltaOp::Insert(text) => output.push_str(text),
            }
        }

        output.extend(remaining);
        Ok(output)
    }

    fn overrun(position: usize, op: &DeltaOp) -> RelayError {
        RelayError::validation_error(
            "replacements",
            &format!("operation #{} ({}) runs past the end of the document", position, op),
        )
    }
}
