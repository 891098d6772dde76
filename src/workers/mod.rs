pub mod command_runner;
pub mod edit_stream_worker;
