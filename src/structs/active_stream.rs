use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStream {
    pub session_id: String,
    pub thread_id: String,
    pub started_at: DateTime<Utc>,
}
