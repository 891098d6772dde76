pub mod event_sink;
pub mod upstream_provider;
