use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "ConfigHelper::default_host")]
    pub host: String,

    #[serde(default = "ConfigHelper::default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty allows same-origin callers only.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "ConfigHelper::default_max_request_bytes")]
    pub max_request_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: ConfigHelper::default_host(),
            port: ConfigHelper::default_port(),
            cors_origins: Vec::new(),
            max_request_bytes: ConfigHelper::default_max_request_bytes(),
        }
    }
}
