pub mod ai_providers;
pub mod delta_applier;
pub mod fragment_parser;
pub mod operation_classifier;
pub mod stream_error_codes;
pub mod stream_reconciler;
