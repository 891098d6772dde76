pub mod active_stream;
pub mod ai;
pub mod api_error_body;
pub mod cli;
pub mod config;
pub mod edit_request;
pub mod extracted_element;
pub mod extraction_batch;
pub mod finalize_report;
pub mod finalized_payload;
pub mod stream_session;
pub mod stream_summary;
