//! Fake Voice Client - 离线假上游
//!
//! 不调用任何外部服务：克隆返回随机音色标识，合成返回固定音频文件
//! （未配置时返回文本字节）。用于本地调试和测试。

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{
    AudioChunk, CloneRequest, ProviderError, SynthesisRequest, VoiceProviderPort,
};
use crate::domain::voice::VoiceId;

/// Fake Voice Client 配置
#[derive(Debug, Clone, Default)]
pub struct FakeVoiceClientConfig {
    /// 每块固定返回的音频文件
    pub audio_file_path: Option<PathBuf>,
    /// 模拟每次调用的延迟（毫秒）
    pub latency_ms: u64,
    /// 第 n 次合成调用（从 0 开始）返回上游错误
    pub fail_on_call: Option<usize>,
}

/// Fake Voice Client
pub struct FakeVoiceClient {
    config: FakeVoiceClientConfig,
    /// 缓存的音频数据
    audio_data: Option<Vec<u8>>,
    voices: Mutex<Vec<(VoiceId, String)>>,
    synthesis_calls: Mutex<Vec<String>>,
}

impl FakeVoiceClient {
    /// 创建新的 FakeVoiceClient
    pub fn new(config: FakeVoiceClientConfig) -> Result<Self, std::io::Error> {
        let audio_data = match &config.audio_file_path {
            Some(path) => Some(std::fs::read(path)?),
            None => None,
        };

        tracing::info!(
            audio_file = ?config.audio_file_path,
            latency_ms = config.latency_ms,
            "FakeVoiceClient initialized"
        );

        Ok(Self {
            config,
            audio_data,
            voices: Mutex::new(Vec::new()),
            synthesis_calls: Mutex::new(Vec::new()),
        })
    }

    /// 已克隆的音色（标识, 名称）
    pub fn cloned_voices(&self) -> Vec<(VoiceId, String)> {
        self.voices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 按调用顺序记录的合成文本
    pub fn synthesis_calls(&self) -> Vec<String> {
        self.synthesis_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl VoiceProviderPort for FakeVoiceClient {
    async fn clone_voice(&self, request: CloneRequest) -> Result<VoiceId, ProviderError> {
        self.simulate_latency().await;

        let voice_id = VoiceId::new(format!("fake-{}", Uuid::new_v4()))
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            voice_id = %voice_id,
            name = %request.name,
            sample_size = request.sample.len(),
            "FakeVoiceClient: voice cloned"
        );

        self.voices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((voice_id.clone(), request.name.as_str().to_string()));

        Ok(voice_id)
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<AudioChunk, ProviderError> {
        let call = {
            let mut calls = self
                .synthesis_calls
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            calls.push(request.text.clone());
            calls.len() - 1
        };

        self.simulate_latency().await;

        if self.config.fail_on_call == Some(call) {
            return Err(ProviderError::Upstream {
                status: 500,
                message: format!("Fake failure on chunk {}", request.index),
            });
        }

        tracing::debug!(
            voice_id = %request.voice_id,
            chunk_index = request.index,
            text_len = request.text.len(),
            "FakeVoiceClient: returning audio"
        );

        let data = match &self.audio_data {
            Some(audio) => audio.clone(),
            None => request.text.into_bytes(),
        };

        Ok(AudioChunk {
            index: request.index,
            data,
            content_type: Some("audio/mpeg".to_string()),
        })
    }

    async fn list_voices(&self) -> Result<Vec<serde_json::Value>, ProviderError> {
        let voices = self
            .voices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(id, name)| {
                serde_json::json!({
                    "voice_id": id.as_str(),
                    "name": name,
                    "category": "cloned",
                })
            })
            .collect();

        Ok(voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{AudioSample, SampleLimits, VoiceName};

    #[tokio::test]
    async fn test_returns_configured_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.mp3");
        std::fs::write(&path, [0xFF, 0xFB, 0x90, 0x00]).unwrap();

        let client = FakeVoiceClient::new(FakeVoiceClientConfig {
            audio_file_path: Some(path),
            ..FakeVoiceClientConfig::default()
        })
        .unwrap();

        let chunk = client
            .synthesize(SynthesisRequest {
                voice_id: VoiceId::new("v").unwrap(),
                index: 3,
                text: "ignored".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(chunk.index, 3);
        assert_eq!(chunk.data, vec![0xFF, 0xFB, 0x90, 0x00]);
    }

    #[test]
    fn test_missing_audio_file_fails() {
        let result = FakeVoiceClient::new(FakeVoiceClientConfig {
            audio_file_path: Some(PathBuf::from("/nonexistent/voxrelay/tone.mp3")),
            ..FakeVoiceClientConfig::default()
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cloned_voice_is_listed() {
        let client = FakeVoiceClient::new(FakeVoiceClientConfig::default()).unwrap();
        let sample =
            AudioSample::new(vec![1], "audio/wav", "a.wav", &SampleLimits::default()).unwrap();

        let voice_id = client
            .clone_voice(CloneRequest {
                name: VoiceName::new("Eve").unwrap(),
                description: String::new(),
                sample,
            })
            .await
            .unwrap();

        let voices = client.list_voices().await.unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0]["voice_id"], voice_id.as_str());
    }
}
