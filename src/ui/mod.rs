pub mod edit_server;
pub mod sse_transport;
pub mod stream_registry;
