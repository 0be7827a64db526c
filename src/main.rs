//! VoxRelay - 声音克隆中继服务
//!
//! 浏览器端只与本服务通信，上游凭据只保存在服务端。

use std::sync::Arc;

use voxrelay::application::VoiceProviderPort;
use voxrelay::config::{load_config, print_config, AppConfig, LogConfig, UpstreamKind};
use voxrelay::infrastructure::adapters::{
    FakeVoiceClient, FakeVoiceClientConfig, HttpVoiceClient, HttpVoiceClientConfig,
    SynthesisOptions, VoiceSettings,
};
use voxrelay::infrastructure::http::{AppState, HttpServer, RelayOptions, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("VoxRelay - 声音克隆中继服务");
    print_config(&config);

    let provider = build_provider(&config)?;

    let state = AppState::new(provider, RelayOptions::from_config(&config));
    let server = HttpServer::new(ServerConfig::from_app_config(&config), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志
fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},voxrelay={},tower_http=debug",
        log.level, log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置创建上游 provider
fn build_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn VoiceProviderPort>> {
    let upstream = &config.upstream;

    match upstream.kind {
        UpstreamKind::Http => {
            let api_key = upstream
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Upstream API key is not configured"))?;

            let settings = &config.synthesis.voice_settings;
            let synthesis = SynthesisOptions {
                model_id: config.synthesis.model_id.clone(),
                output_format: config.synthesis.output_format.clone(),
                optimize_streaming_latency: config.synthesis.optimize_streaming_latency,
                voice_settings: VoiceSettings {
                    stability: settings.stability,
                    similarity_boost: settings.similarity_boost,
                    style: settings.style,
                    use_speaker_boost: settings.use_speaker_boost,
                },
            };

            let client_config = HttpVoiceClientConfig {
                auth_header: upstream.auth_header.clone(),
                ..HttpVoiceClientConfig::new(&upstream.base_url, api_key)
            }
            .with_timeout(upstream.timeout_secs)
            .with_synthesis(synthesis);

            Ok(Arc::new(HttpVoiceClient::new(client_config)?))
        }
        UpstreamKind::Fake => {
            tracing::warn!("Using fake upstream, no external calls will be made");
            let client = FakeVoiceClient::new(FakeVoiceClientConfig {
                audio_file_path: upstream.fake_audio_path.clone(),
                ..FakeVoiceClientConfig::default()
            })?;
            Ok(Arc::new(client))
        }
    }
}
