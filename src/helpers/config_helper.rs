use crate::config::constants::{
    DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_KEEP_ALIVE_SECS, DEFAULT_MAX_BUFFER_BYTES,
    DEFAULT_MAX_REQUEST_BYTES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_PROVIDER, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TEMPERATURE,
    OPENAI_API_KEY_ENV,
};

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_host() -> String {
        DEFAULT_SERVER_HOST.to_string()
    }

    pub fn default_port() -> u16 {
        DEFAULT_SERVER_PORT
    }

    pub fn default_max_request_bytes() -> u64 {
        DEFAULT_MAX_REQUEST_BYTES
    }

    pub fn default_enabled() -> bool {
        true
    }

    pub fn default_provider() -> String {
        DEFAULT_PROVIDER.to_string()
    }

    pub fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    pub fn default_base_url() -> String {
        DEFAULT_OPENAI_BASE_URL.to_string()
    }

    pub fn default_api_key_env() -> String {
        OPENAI_API_KEY_ENV.to_string()
    }

    pub fn default_max_tokens() -> u32 {
        DEFAULT_MAX_TOKENS
    }

    pub fn default_temperature() -> f32 {
        DEFAULT_TEMPERATURE
    }

    pub fn default_idle_timeout_secs() -> u64 {
        DEFAULT_IDLE_TIMEOUT_SECS
    }

    pub fn default_keep_alive_secs() -> u64 {
        DEFAULT_KEEP_ALIVE_SECS
    }

    pub fn default_max_buffer_bytes() -> usize {
        DEFAULT_MAX_BUFFER_BYTES
    }
}
