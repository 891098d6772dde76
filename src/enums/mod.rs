pub mod ai_provider_error;
pub mod commands;
pub mod content_element;
pub mod delta_op;
pub mod session_state;
pub mod sse_event;
pub mod stream_error_code;
pub mod stream_outcome;
pub mod upstream_event;
