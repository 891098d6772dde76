use serde::{Deserialize, Serialize};
use crate::enums::delta_op::DeltaOp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedPayload {
    pub message: String,
    pub replacements: Vec<DeltaOp>,
}
