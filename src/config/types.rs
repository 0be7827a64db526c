//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::domain::voice::{SampleLimits, DEFAULT_ALLOWED_MIME_TYPES};
use crate::domain::{ChunkConfig, DEFAULT_BOUNDARIES, DEFAULT_MAX_CHARS};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 上游语音服务配置
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// 合成配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 克隆配置
    #[serde(default)]
    pub clone: CloneConfig,

    /// 上传限制
    #[serde(default)]
    pub limits: LimitsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// ============================================================================
// Server
// ============================================================================

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置（托管浏览器端页面）
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Upstream
// ============================================================================

/// 上游 API 凭据
///
/// 只在进程启动时加载一次；Debug 输出被屏蔽，不会出现在日志或错误信息中。
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// 把文本中出现的凭据替换为 `***`
    pub fn redact(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        text.replace(self.0.as_str(), "***")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// 上游实现类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
    /// 真实的 HTTP 上游
    #[default]
    Http,
    /// 离线假上游（本地调试）
    Fake,
}

/// 上游语音服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub kind: UpstreamKind,

    /// 上游 API 基础 URL
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    /// API 凭据
    #[serde(default)]
    pub api_key: Option<ApiKey>,

    /// 携带凭据的请求头
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// 单次上游调用超时时间（秒）
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,

    /// 假上游每块返回的音频文件；未设置时返回文本字节
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,
}

fn default_upstream_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_auth_header() -> String {
    "xi-api-key".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            kind: UpstreamKind::default(),
            base_url: default_upstream_url(),
            api_key: None,
            auth_header: default_auth_header(),
            timeout_secs: default_upstream_timeout(),
            fake_audio_path: None,
        }
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// 合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 单块最大字符数
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// 断点标点，按优先级排列
    #[serde(default = "default_boundaries")]
    pub boundaries: String,

    /// 同时进行的上游调用数，1 表示严格串行
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_output_format")]
    pub output_format: String,

    #[serde(default = "default_streaming_latency")]
    pub optimize_streaming_latency: u8,

    #[serde(default)]
    pub voice_settings: VoiceSettingsConfig,
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_boundaries() -> String {
    DEFAULT_BOUNDARIES.iter().collect()
}

fn default_max_in_flight() -> usize {
    1
}

fn default_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_streaming_latency() -> u8 {
    3
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            boundaries: default_boundaries(),
            max_in_flight: default_max_in_flight(),
            model_id: default_model_id(),
            output_format: default_output_format(),
            optimize_streaming_latency: default_streaming_latency(),
            voice_settings: VoiceSettingsConfig::default(),
        }
    }
}

impl SynthesisConfig {
    /// 转换为分块配置
    pub fn chunk_config(&self) -> ChunkConfig {
        let max_chars = NonZeroUsize::new(self.max_chunk_chars).unwrap_or(NonZeroUsize::MIN);
        ChunkConfig::new(max_chars, self.boundaries.chars().collect())
    }
}

/// 上游音色参数
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSettingsConfig {
    #[serde(default = "default_stability")]
    pub stability: f32,

    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    #[serde(default)]
    pub style: f32,

    #[serde(default = "default_speaker_boost")]
    pub use_speaker_boost: bool,
}

fn default_stability() -> f32 {
    0.5
}

fn default_similarity_boost() -> f32 {
    0.75
}

fn default_speaker_boost() -> bool {
    true
}

impl Default for VoiceSettingsConfig {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: 0.0,
            use_speaker_boost: default_speaker_boost(),
        }
    }
}

// ============================================================================
// Clone / Limits / Log
// ============================================================================

/// 克隆配置
#[derive(Debug, Clone, Deserialize)]
pub struct CloneConfig {
    /// 发送给上游的音色描述
    #[serde(default = "default_clone_description")]
    pub description: String,
}

fn default_clone_description() -> String {
    crate::application::DEFAULT_CLONE_DESCRIPTION.to_string()
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            description: default_clone_description(),
        }
    }
}

/// 上传限制
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// 样本文件最大字节数，默认 10MB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// 允许的样本 MIME 类型
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

fn default_allowed_mime_types() -> Vec<String> {
    DEFAULT_ALLOWED_MIME_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl LimitsConfig {
    pub fn sample_limits(&self) -> SampleLimits {
        SampleLimits {
            max_bytes: self.max_upload_bytes,
            allowed_mime_types: self.allowed_mime_types.clone(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.base_url, "https://api.elevenlabs.io/v1");
        assert_eq!(config.upstream.kind, UpstreamKind::Http);
        assert_eq!(config.synthesis.max_chunk_chars, 1000);
        assert_eq!(config.synthesis.max_in_flight, 1);
        assert_eq!(config.limits.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_chunk_config_from_synthesis() {
        let config = SynthesisConfig {
            max_chunk_chars: 20,
            boundaries: "。.".to_string(),
            ..SynthesisConfig::default()
        };
        let chunk = config.chunk_config();
        assert_eq!(chunk.max_chars.get(), 20);
        assert_eq!(chunk.boundaries, vec!['。', '.']);
    }

    #[test]
    fn test_default_boundaries_start_with_newline() {
        let config = SynthesisConfig::default();
        assert_eq!(config.boundaries.chars().next(), Some('\n'));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("sk_secret_value");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
        assert_eq!(key.redact("bad key sk_secret_value"), "bad key ***");
    }
}
