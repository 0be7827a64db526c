//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, UpstreamKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOXRELAY";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXRELAY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值（`PORT` 环境变量作为默认端口）
///
/// # 环境变量示例
/// - `VOXRELAY_SERVER__PORT=8080`
/// - `VOXRELAY_UPSTREAM__API_KEY=sk_...`
/// - `VOXRELAY_SYNTHESIS__MAX_IN_FLIGHT=2`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let default_port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", i64::from(default_port))?
        .set_default("upstream.kind", "http")?
        .set_default("upstream.base_url", "https://api.elevenlabs.io/v1")?
        .set_default("upstream.auth_header", "xi-api-key")?
        .set_default("upstream.timeout_secs", 30)?
        .set_default("synthesis.max_chunk_chars", 1000)?
        .set_default("synthesis.max_in_flight", 1)?
        .set_default("synthesis.model_id", "eleven_multilingual_v2")?
        .set_default("synthesis.output_format", "mp3_44100_128")?
        .set_default("synthesis.optimize_streaming_latency", 3)?
        .set_default("limits.max_upload_bytes", 10 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOXRELAY_UPSTREAM__BASE_URL=https://api.example.com/v1
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.upstream.kind == UpstreamKind::Http {
        if config.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Upstream base URL cannot be empty".to_string(),
            ));
        }
        if config.upstream.api_key.as_ref().map_or(true, |k| k.is_empty()) {
            return Err(ConfigError::ValidationError(
                "Upstream API key is required (set VOXRELAY_UPSTREAM__API_KEY)".to_string(),
            ));
        }
        if config.upstream.auth_header.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Upstream auth header cannot be empty".to_string(),
            ));
        }
    }

    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Upstream timeout cannot be 0".to_string(),
        ));
    }

    if config.synthesis.max_chunk_chars == 0 {
        return Err(ConfigError::ValidationError(
            "synthesis.max_chunk_chars must be greater than 0".to_string(),
        ));
    }

    if config.synthesis.max_in_flight == 0 {
        return Err(ConfigError::ValidationError(
            "synthesis.max_in_flight must be greater than 0".to_string(),
        ));
    }

    if config.synthesis.boundaries.is_empty() {
        return Err(ConfigError::ValidationError(
            "synthesis.boundaries cannot be empty".to_string(),
        ));
    }

    if config.limits.allowed_mime_types.is_empty() {
        return Err(ConfigError::ValidationError(
            "limits.allowed_mime_types cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// 凭据只显示是否已配置。
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Upstream: {:?} {}", config.upstream.kind, config.upstream.base_url);
    tracing::info!(
        "Upstream API Key: {}",
        if config.upstream.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
            "configured"
        } else {
            "missing"
        }
    );
    tracing::info!("Upstream Timeout: {}s", config.upstream.timeout_secs);
    tracing::info!("Max Chunk Chars: {}", config.synthesis.max_chunk_chars);
    tracing::info!("Max In-Flight Chunks: {}", config.synthesis.max_in_flight);
    tracing::info!("Model: {}", config.synthesis.model_id);
    tracing::info!("Max Upload: {} bytes", config.limits.max_upload_bytes);
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
