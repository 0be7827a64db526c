//! HTTP Voice Client - 调用第三方声音克隆 / 语音合成服务
//!
//! 实现 VoiceProviderPort trait，通过 HTTP 调用 ElevenLabs 兼容的 API
//!
//! 上游 API:
//! POST {base}/voices/add                        multipart: name, description, files
//! POST {base}/text-to-speech/{voice_id}/stream  JSON -> audio/mpeg binary
//! GET  {base}/voices                            JSON {"voices": [...]}
//!
//! 所有请求都带凭据头；任何从本客户端返回的错误信息都已屏蔽凭据。

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    AudioChunk, CloneRequest, ProviderError, SynthesisRequest, VoiceProviderPort,
};
use crate::config::ApiKey;
use crate::domain::voice::VoiceId;

const CLONE_FALLBACK_MESSAGE: &str = "Voice clone failed";
const SYNTHESIS_FALLBACK_MESSAGE: &str = "Audio generation failed";
const LIST_FALLBACK_MESSAGE: &str = "Failed to list voices";

// ============================================================================
// Wire types
// ============================================================================

/// 上游音色参数
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
    output_format: &'a str,
    optimize_streaming_latency: u8,
}

#[derive(Debug, Deserialize)]
struct CloneHttpResponse {
    #[serde(default)]
    voice_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoicesHttpResponse {
    #[serde(default)]
    voices: Option<Vec<serde_json::Value>>,
}

// ============================================================================
// Config
// ============================================================================

/// 合成参数
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    pub model_id: String,
    pub output_format: String,
    pub optimize_streaming_latency: u8,
    pub voice_settings: VoiceSettings,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            model_id: "eleven_multilingual_v2".to_string(),
            output_format: "mp3_44100_128".to_string(),
            optimize_streaming_latency: 3,
            voice_settings: VoiceSettings::default(),
        }
    }
}

/// HTTP Voice 客户端配置
#[derive(Debug, Clone)]
pub struct HttpVoiceClientConfig {
    /// 上游 API 基础 URL（含版本前缀，如 https://api.elevenlabs.io/v1）
    pub base_url: String,
    pub api_key: ApiKey,
    /// 携带凭据的请求头
    pub auth_header: String,
    /// 单次调用超时时间（秒）
    pub timeout_secs: u64,
    pub synthesis: SynthesisOptions,
}

impl HttpVoiceClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            auth_header: "xi-api-key".to_string(),
            timeout_secs: 30,
            synthesis: SynthesisOptions::default(),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisOptions) -> Self {
        self.synthesis = synthesis;
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP Voice 客户端
pub struct HttpVoiceClient {
    client: Client,
    base_url: Url,
    auth_header: HeaderName,
    auth_value: HeaderValue,
    config: HttpVoiceClientConfig,
}

impl HttpVoiceClient {
    /// 创建新的客户端
    pub fn new(config: HttpVoiceClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            ProviderError::InvalidRequest(format!("Invalid upstream base URL: {}", e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidRequest(
                "Upstream base URL cannot be used as a base".to_string(),
            ));
        }

        let auth_header = HeaderName::from_bytes(config.auth_header.as_bytes()).map_err(|_| {
            ProviderError::InvalidRequest(format!(
                "Invalid upstream auth header name: {}",
                config.auth_header
            ))
        })?;
        let mut auth_value = HeaderValue::from_str(config.api_key.expose()).map_err(|_| {
            ProviderError::InvalidRequest("Upstream API key contains invalid characters".to_string())
        })?;
        auth_value.set_sensitive(true);

        Ok(Self {
            client,
            base_url,
            auth_header,
            auth_value,
            config,
        })
    }

    /// 在基础 URL 后追加路径段（每段单独做百分号编码）
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::InvalidRequest(
                    "Upstream base URL cannot be used as a base".to_string(),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 屏蔽错误信息中的凭据
    fn sanitize(&self, err: ProviderError) -> ProviderError {
        let key = &self.config.api_key;
        match err {
            ProviderError::Network(msg) => ProviderError::Network(key.redact(&msg)),
            ProviderError::Timeout => ProviderError::Timeout,
            ProviderError::Upstream { status, message } => ProviderError::Upstream {
                status,
                message: key.redact(&message),
            },
            ProviderError::InvalidResponse(msg) => ProviderError::InvalidResponse(key.redact(&msg)),
            ProviderError::InvalidRequest(msg) => ProviderError::InvalidRequest(key.redact(&msg)),
        }
    }

    /// 非成功状态码转换为 Upstream 错误
    async fn check_status(
        &self,
        response: Response,
        fallback: &str,
    ) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = extract_error_message(&body, fallback);

        tracing::warn!(
            status = status.as_u16(),
            error = %self.config.api_key.redact(&message),
            "Upstream returned error"
        );

        Err(ProviderError::Upstream {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_clone(&self, request: CloneRequest) -> Result<VoiceId, ProviderError> {
        let url = self.endpoint(&["voices", "add"])?;

        let file_name = request.sample.file_name().to_string();
        let mime_type = request.sample.mime_type().to_string();
        let part = Part::bytes(request.sample.into_data())
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| ProviderError::InvalidRequest(format!("Invalid sample MIME type: {}", e)))?;

        let form = Form::new()
            .text("name", request.name.as_str().to_string())
            .text("description", request.description)
            .part("files", part);

        tracing::debug!(url = %url, name = %request.name, "Sending voice clone request");

        let response = self
            .client
            .post(url)
            .header(self.auth_header.clone(), self.auth_value.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = self.check_status(response, CLONE_FALLBACK_MESSAGE).await?;

        let body: CloneHttpResponse = response.json().await.map_err(map_body_error)?;
        let voice_id = body.voice_id.ok_or_else(|| {
            ProviderError::InvalidResponse("Upstream response did not contain voice_id".to_string())
        })?;

        VoiceId::new(voice_id).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn send_synthesis(&self, request: SynthesisRequest) -> Result<AudioChunk, ProviderError> {
        let url = self.endpoint(&["text-to-speech", request.voice_id.as_str(), "stream"])?;
        let options = &self.config.synthesis;

        let body = TtsHttpRequest {
            text: &request.text,
            model_id: &options.model_id,
            voice_settings: &options.voice_settings,
            output_format: &options.output_format,
            optimize_streaming_latency: options.optimize_streaming_latency,
        };

        tracing::debug!(
            voice_id = %request.voice_id,
            chunk_index = request.index,
            text_len = request.text.len(),
            "Sending TTS request"
        );

        let response = self
            .client
            .post(url)
            .header(self.auth_header.clone(), self.auth_value.clone())
            .header(ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = self.check_status(response, SYNTHESIS_FALLBACK_MESSAGE).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let data = response.bytes().await.map_err(map_body_error)?.to_vec();

        tracing::debug!(
            chunk_index = request.index,
            audio_size = data.len(),
            content_type = ?content_type,
            "TTS chunk received"
        );

        Ok(AudioChunk {
            index: request.index,
            data,
            content_type,
        })
    }

    async fn fetch_voices(&self) -> Result<Vec<serde_json::Value>, ProviderError> {
        let url = self.endpoint(&["voices"])?;

        let response = self
            .client
            .get(url)
            .header(self.auth_header.clone(), self.auth_value.clone())
            .send()
            .await
            .map_err(map_send_error)?;

        let response = self.check_status(response, LIST_FALLBACK_MESSAGE).await?;

        let body: VoicesHttpResponse = response.json().await.map_err(map_body_error)?;
        body.voices.ok_or_else(|| {
            ProviderError::InvalidResponse("Upstream response did not contain voices".to_string())
        })
    }
}

#[async_trait]
impl VoiceProviderPort for HttpVoiceClient {
    async fn clone_voice(&self, request: CloneRequest) -> Result<VoiceId, ProviderError> {
        self.send_clone(request).await.map_err(|e| self.sanitize(e))
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioChunk, ProviderError> {
        self.send_synthesis(request).await.map_err(|e| self.sanitize(e))
    }

    async fn list_voices(&self) -> Result<Vec<serde_json::Value>, ProviderError> {
        self.fetch_voices().await.map_err(|e| self.sanitize(e))
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_connect() {
        ProviderError::Network(format!("Cannot connect to upstream: {}", e))
    } else {
        ProviderError::Network(e.to_string())
    }
}

fn map_body_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::InvalidResponse(format!("Failed to read upstream response: {}", e))
    }
}

/// 从上游错误负载中提取错误信息
///
/// 依次尝试 `detail`（字符串）、`detail.message`、序列化后的 `detail`、
/// 顶层 `message`；非 JSON 负载使用原始文本；都没有时使用 fallback。
fn extract_error_message(body: &[u8], fallback: &str) -> String {
    use serde_json::Value;

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(detail @ Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(|| detail.to_string()),
            Some(detail) if !detail.is_null() && !detail.is_string() => detail.to_string(),
            _ => value
                .get("message")
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(|| fallback.to_string()),
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                fallback.to_string()
            } else {
                text
            }
        }
    }
}
