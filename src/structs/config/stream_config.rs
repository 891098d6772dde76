use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::config::constants::timeout_duration_secs;
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Seconds without an upstream event before the stream is closed.
    #[serde(default = "ConfigHelper::default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Seconds between SSE keep-alive comments; 0 disables them.
    #[serde(default = "ConfigHelper::default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    #[serde(default = "ConfigHelper::default_max_buffer_bytes")]
    pub max_buffer_bytes: usize,
}

impl StreamConfig {
    pub fn idle_timeout(&self) -> Duration {
        timeout_duration_secs(self.idle_timeout_secs.max(1))
    }

    pub fn keep_alive_interval(&self) -> Option<Duration> {
        (self.keep_alive_secs > 0).then(|| timeout_duration_secs(self.keep_alive_secs))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: ConfigHelper::default_idle_timeout_secs(),
            keep_alive_secs: ConfigHelper::default_keep_alive_secs(),
            max_buffer_bytes: ConfigHelper::default_max_buffer_bytes(),
        }
    }
}
