use std::sync::Arc;
use crate::errors::{RelayError, RelayResult};
use crate::structs::config::ai_config::AiConfig;
use crate::traits::upstream_provider::UpstreamProvider;

pub mod openai;
pub mod scripted;

use openai::OpenAIProvider;

/// Provider for the configured AI settings, or `None` when AI is off or no
/// API key is available.
pub fn build_provider(config: &AiConfig) -> RelayResult<Option<Arc<dyn UpstreamProvider>>> {
    if !config.enabled {
        log::info!("🔕 AI is disabled in configuration");
        return Ok(None);
    }

    match config.provider.to_lowercase().as_str() {
        "openai" => {
            if config.api_key().is_none() {
                log::warn!("⚠️ {} is not set; edit requests will be rejected", config.api_key_env);
                return Ok(None);
            }
            let provider = OpenAIProvider::from_config(config)?;
            log::info!("🤖 Using OpenAI model {}", config.model);
            Ok(Some(Arc::new(provider)))
        }
        other => Err(RelayError::config_error(
            &format!("Unsupported AI provider: {}", other),
            Some("ai.provider"),
            Some("Use \"openai\""),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_has_no_provider() {
        let config = AiConfig {
            enabled: false,
            ..AiConfig::default()
        };
        assert!(build_provider(&config).unwrap().is_none());
    }

    #[test]
    fn missing_key_has_no_provider() {
        let config = AiConfig {
            api_key_env: "EDITOR_RELAY_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..AiConfig::default()
        };
        assert!(build_provider(&config).unwrap().is_none());
    }

    #[test]
    fn unknown_provider_is_a_configuration_error() {
        let config = AiConfig {
            provider: "carrier-pigeon".into(),
            ..AiConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(RelayError::ConfigurationError { .. })
        ));
    }
}
