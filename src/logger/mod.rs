pub mod stream_logger;
