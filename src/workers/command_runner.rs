use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use futures::StreamExt;
use crate::config::config_manager::ConfigManager;
use crate::enums::commands::Commands;
use crate::enums::sse_event::SseEvent;
use crate::errors::{RelayError, RelayResult, ResultExt};
use crate::logger::stream_logger::StreamLogger;
use crate::services::ai_providers::build_provider;
use crate::services::ai_providers::scripted::ScriptedProvider;
use crate::services::delta_applier::DeltaApplier;
use crate::structs::config::config::Config;
use crate::structs::config::stream_config::StreamConfig;
use crate::structs::edit_request::EditRequest;
use crate::structs::stream_summary::StreamSummary;
use crate::ui::edit_server::{EditContext, EditServer};
use crate::ui::sse_transport::SseTransport;
use crate::workers::edit_stream_worker::EditStreamWorker;

/// Result of pushing a captured document through the relay offline.
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    pub summary: StreamSummary,
    /// Raw SSE frames in write order.
    pub frames: Vec<String>,
}

impl ReplayOutput {
    pub fn events(&self) -> Vec<SseEvent> {
        self.frames.iter().filter_map(|frame| decode_frame(frame)).collect()
    }

    pub fn finalized(&self) -> Option<SseEvent> {
        self.events()
            .into_iter()
            .find(|event| matches!(event, SseEvent::Finalized { .. }))
    }
}

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self { start_time: None }
    }

    pub async fn run_command(&mut self, command: Commands) -> RelayResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command().await,
            Commands::Validate => self.validate_command().await,
            Commands::Serve { host, port } => self.serve_command(host, port).await,
            Commands::Replay { file, chunk_size, markdown } => self.replay_command(file, chunk_size, markdown).await,
        };

        if let Some(start) = self.start_time {
            let duration = start.elapsed();
            log::info!("⏱️  Command completed in {:.2}s", duration.as_secs_f64());
        }

        result
    }

    async fn init_command(&self) -> RelayResult<()> {
        log::info!("🚀 Initializing relay configuration...");

        match ConfigManager::create_sample_config() {
            Ok(path) => {
                log::info!("✅ Configuration file created at {}", path.display());
                log::info!("🔑 Export your API key in the variable named by ai.api_key_env.");
                log::info!("🔧 Run 'editor-assistant-relay validate' to check your configuration.");
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Failed to create configuration: {}", e);
                Err(e)
            }
        }
    }

    async fn validate_command(&self) -> RelayResult<()> {
        log::info!("🔍 Validating relay configuration...");

        let config = Self::load_config()?;

        if let Err(errors) = ConfigManager::validate_config(&config) {
            log::error!("❌ Issues found:");
            for error in &errors {
                log::error!("   - {}", error);
            }
            return Err(RelayError::config_error(
                &format!("{} configuration problem(s) found", errors.len()),
                None,
                Some("Fix the listed fields and run validate again"),
            ));
        }

        if config.ai.enabled && config.ai.api_key().is_none() {
            log::warn!("⚠️ {} is not set; edit requests will answer 501", config.ai.api_key_env);
        }

        log::info!("✅ Configuration is valid");
        Ok(())
    }

    async fn serve_command(&self, host: Option<String>, port: Option<u16>) -> RelayResult<()> {
        let mut config = Self::load_config()?;
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }

        if let Err(errors) = ConfigManager::validate_config(&config) {
            for error in &errors {
                log::error!("❌ {}", error);
            }
            return Err(RelayError::config_error("Invalid configuration", None, Some("Run 'editor-assistant-relay validate'")));
        }

        let provider = build_provider(&config.ai)?;
        let context = EditContext::new(provider, config.stream.clone());
        let mut server = EditServer::new(config.server.clone(), context);
        server.start().await?;

        log::info!("📡 Press Ctrl+C to stop");
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| RelayError::system_error("signal", &e.to_string()))?;

        server.shutdown().await
    }

    async fn replay_command(&self, file: PathBuf, chunk_size: usize, markdown: Option<PathBuf>) -> RelayResult<()> {
        log::info!("🎬 Replaying {} in chunks of {} characters", file.display(), chunk_size);

        let document = Self::read_file(&file)?;
        let stream_config = Self::load_config().map(|config| config.stream).unwrap_or_default();
        let output = Self::replay_document(&document, chunk_size, stream_config).await;

        for frame in &output.frames {
            print!("{}", frame);
        }
        StreamLogger::print_events(&output.events());

        if let Some(markdown_path) = markdown {
            let Some(SseEvent::Finalized { finalized }) = output.finalized() else {
                log::warn!("⚠️ No final result to apply ({:?})", output.summary.outcome);
                return Ok(());
            };

            let original = Self::read_file(&markdown_path)?;
            let edited = DeltaApplier::apply(&original, &finalized.replacements)?;
            println!("\n📝 Edited markdown:");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("{}", edited);
        }

        Ok(())
    }

    /// Stream `document` through a worker in `chunk_size` character chunks.
    pub async fn replay_document(document: &str, chunk_size: usize, stream_config: StreamConfig) -> ReplayOutput {
        let provider = Arc::new(ScriptedProvider::from_document(document, chunk_size));
        let request = EditRequest::new("replay", "replay", Some("replay"));
        let (transport, receiver) = SseTransport::channel();

        let worker = EditStreamWorker::new("replay", stream_config);
        let summary = worker.run(provider, request, transport).await;

        let frames: Vec<String> = SseTransport::body_stream(receiver)
            .filter_map(|frame| async move { frame.ok() })
            .map(|frame| String::from_utf8_lossy(&frame).into_owned())
            .collect()
            .await;

        ReplayOutput { summary, frames }
    }

    fn load_config() -> RelayResult<Config> {
        ConfigManager::load().map_err(|e| {
            log::error!("❌ Failed to load configuration: {}", e);
            log::error!("💡 Run 'editor-assistant-relay init' to create a configuration file.");
            e
        })
    }

    fn read_file(path: &Path) -> RelayResult<String> {
        fs::read_to_string(path).with_operation(&format!("read {}", path.display()))
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_frame(frame: &str) -> Option<SseEvent> {
    let payload = frame.strip_prefix("data: ")?.strip_suffix("\n\n")?;
    serde_json::from_str(payload).ok()
}
