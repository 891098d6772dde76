use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::errors::{RelayError, RelayResult};
use crate::structs::config::config::Config;

const SAMPLE_CONFIG: &str = r#"# Editor assistant relay configuration

[server]
host = "127.0.0.1"
port = 3030

# Origins allowed to call the API from a browser
cors_origins = ["http://localhost:3000"]

# Largest accepted request body, in bytes
max_request_bytes = 2097152

[ai]
enabled = true
provider = "openai"
model = "gpt-4o-mini"
base_url = "https://api.openai.com/v1"

# The key itself is never stored here
api_key_env = "OPENAI_API_KEY"

max_tokens = 4096
temperature = 1.0

[stream]
# Close the stream when the AI service sends nothing for this long
idle_timeout_secs = 60

# Seconds between SSE keep-alive comments (0 disables them)
keep_alive_secs = 15

# Upper bound for a single buffered response, in bytes
max_buffer_bytes = 4194304
"#;

pub struct ConfigManager;

impl ConfigManager {
    pub fn config_path() -> RelayResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                RelayError::config_error(
                    "Could not determine the home directory",
                    None,
                    Some("Set the HOME environment variable"),
                )
            })
    }

    /// Load the user config, falling back to defaults when none exists.
    pub fn load() -> RelayResult<Config> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::info!("📋 No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> RelayResult<Config> {
        log::info!("📋 Loading config from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| RelayError::ConfigurationFileError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| RelayError::ConfigurationFileError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn create_sample_config() -> RelayResult<PathBuf> {
        let path = Self::config_path()?;
        Self::write_sample_config(&path)?;
        Ok(path)
    }

    /// Write the commented sample config to `path`. Refuses to overwrite.
    pub fn write_sample_config(path: &Path) -> RelayResult<()> {
        if path.exists() {
            return Err(RelayError::ConfigurationFileError {
                path: path.display().to_string(),
                reason: "file already exists".to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, SAMPLE_CONFIG)?;

        log::info!("✅ Created sample config at: {}", path.display());
        Ok(())
    }

    /// Every problem found, not just the first.
    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if config.server.host.parse::<IpAddr>().is_err() {
            errors.push(format!("server.host must be an IP address: {}", config.server.host));
        }
        for origin in &config.server.cors_origins {
            if !Self::is_origin(origin) {
                errors.push(format!("server.cors_origins entry is not a scheme://host[:port] origin: {}", origin));
            }
        }
        if config.server.max_request_bytes == 0 {
            errors.push("server.max_request_bytes must be greater than 0".to_string());
        }

        if config.ai.enabled {
            if !config.ai.provider.eq_ignore_ascii_case("openai") {
                errors.push(format!("Unsupported ai.provider: {}", config.ai.provider));
            }
            if config.ai.model.trim().is_empty() {
                errors.push("ai.model must be set".to_string());
            }
            if !config.ai.base_url.starts_with("http://") && !config.ai.base_url.starts_with("https://") {
                errors.push(format!("ai.base_url must be an http(s) URL: {}", config.ai.base_url));
            }
            if config.ai.api_key_env.trim().is_empty() {
                errors.push("ai.api_key_env must name an environment variable".to_string());
            }
            if !(0.0..=2.0).contains(&config.ai.temperature) {
                errors.push(format!("ai.temperature must be between 0 and 2: {}", config.ai.temperature));
            }
            if config.ai.max_tokens == 0 {
                errors.push("ai.max_tokens must be greater than 0".to_string());
            }
        }

        if config.stream.idle_timeout_secs == 0 {
            errors.push("stream.idle_timeout_secs must be greater than 0".to_string());
        }
        if config.stream.max_buffer_bytes == 0 {
            errors.push("stream.max_buffer_bytes must be greater than 0".to_string());
        }
        if config.stream.keep_alive_secs > 0 && config.stream.keep_alive_secs >= config.stream.idle_timeout_secs {
            errors.push("stream.keep_alive_secs should be shorter than stream.idle_timeout_secs".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn is_origin(origin: &str) -> bool {
        let Some(authority) = origin
            .strip_prefix("http://")
            .or_else(|| origin.strip_prefix("https://"))
        else {
            return false;
        };
        !authority.is_empty() && !authority.contains(['/', '?', '#', ' '])
    }
}
