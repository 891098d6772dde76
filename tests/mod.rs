mod edit_server;
mod stream_worker;
