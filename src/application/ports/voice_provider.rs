//! Voice Provider Port - 上游语音服务抽象
//!
//! 定义声音克隆、语音合成、音色列表的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::{AudioSample, VoiceId, VoiceName};

/// 上游调用错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    /// 上游返回非成功状态码，message 为从错误负载中提取的信息
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// 声音克隆请求
#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub name: VoiceName,
    pub description: String,
    pub sample: AudioSample,
}

/// 单块合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub voice_id: VoiceId,
    /// 块序号（用于日志和追踪）
    pub index: usize,
    pub text: String,
}

/// 单块合成结果
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub index: usize,
    /// 原始音频字节
    pub data: Vec<u8>,
    /// 上游声明的 Content-Type
    pub content_type: Option<String>,
}

/// Voice Provider Port
///
/// 第三方声音克隆 / 语音合成服务的抽象接口。实现方持有凭据，
/// 返回的任何错误信息都不得包含凭据。
#[async_trait]
pub trait VoiceProviderPort: Send + Sync {
    /// 上传样本创建克隆音色，返回上游签发的音色标识
    async fn clone_voice(&self, request: CloneRequest) -> Result<VoiceId, ProviderError>;

    /// 合成一段文本，返回该段的音频
    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioChunk, ProviderError>;

    /// 列出上游音色（结构由上游定义，原样透传）
    async fn list_voices(&self) -> Result<Vec<serde_json::Value>, ProviderError>;
}
