use std::time::Duration;

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 3030;
pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 2 * 1024 * 1024;
pub const SERVER_SHUTDOWN_GRACE_PERIOD_MS: u64 = 100;

pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_REPLAY_CHUNK_SIZE: usize = 16;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

pub const CONFIG_DIR_NAME: &str = ".editor-assistant-relay";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const EDIT_API_BASE: &str = "_api";
pub const EDIT_API_VERSION: &str = "v3";
pub const EDIT_API_SCOPE: &str = "openai";
pub const EDIT_API_ROUTE: &str = "edit";

pub const SSE_CONTENT_TYPE: &str = "text/event-stream;charset=utf-8";
pub const SSE_CACHE_CONTROL: &str = "no-cache, no-transform";
pub const SSE_KEEP_ALIVE_COMMENT: &str = "keep-alive";

pub const CONTENTS_KEY: &str = "contents";
pub const MESSAGE_KEY: &str = "message";
pub const INSERT_KEY: &str = "insert";
pub const DELETE_KEY: &str = "delete";
pub const RETAIN_KEY: &str = "retain";

pub fn timeout_duration_secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

pub fn sleep_duration_millis(milliseconds: u64) -> Duration {
    Duration::from_millis(milliseconds)
}
