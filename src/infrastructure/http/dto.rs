//! Data Transfer Objects

use serde::{Deserialize, Serialize};

// ============================================================================
// Clone
// ============================================================================

/// 克隆成功响应
#[derive(Debug, Serialize)]
pub struct CloneVoiceResponse {
    pub voice_id: String,
    pub status: &'static str,
}

impl CloneVoiceResponse {
    pub fn completed(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            status: "completed",
        }
    }
}

// ============================================================================
// TTS
// ============================================================================

/// 文本转语音请求
///
/// 字段缺失时由 handler 返回校验错误，而不是 JSON 反序列化错误。
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

/// 可直接赋给播放 / 下载元素的音频 URL
#[derive(Debug, Serialize)]
pub struct TtsUrlResponse {
    pub url: String,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}
