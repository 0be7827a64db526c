//! Synthesis Command Handlers
//!
//! 长文本分块后逐块调用上游合成，再按原顺序拼接音频字节。

use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::SynthesizeSpeech;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioChunk, SynthesisRequest, VoiceProviderPort};
use crate::domain::voice::VoiceId;
use crate::domain::{chunk_text, ChunkConfig, TextChunk};

/// 上游未声明 Content-Type 时使用的默认类型
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// 合成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// 所有块按顺序拼接后的音频
    pub data: Vec<u8>,
    pub content_type: String,
    pub chunk_count: usize,
}

impl SynthesizedAudio {
    /// 零块合成的结果
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            content_type: DEFAULT_AUDIO_CONTENT_TYPE.to_string(),
            chunk_count: 0,
        }
    }

    /// 逐字节拼接，不重新编码
    fn concat(chunks: Vec<AudioChunk>) -> Self {
        let content_type = chunks
            .first()
            .and_then(|c| c.content_type.clone())
            .unwrap_or_else(|| DEFAULT_AUDIO_CONTENT_TYPE.to_string());
        let chunk_count = chunks.len();
        let total: usize = chunks.iter().map(|c| c.data.len()).sum();

        let mut data = Vec::with_capacity(total);
        for chunk in chunks {
            data.extend_from_slice(&chunk.data);
        }

        Self {
            data,
            content_type,
            chunk_count,
        }
    }
}

/// SynthesizeSpeech Handler
///
/// 默认串行：第 k+1 块只在第 k 块成功后才请求。任意一块失败立即终止整个请求，
/// 不重试，也不返回部分音频。
pub struct SynthesizeSpeechHandler {
    provider: Arc<dyn VoiceProviderPort>,
    chunk_config: ChunkConfig,
    max_in_flight: usize,
}

impl SynthesizeSpeechHandler {
    pub fn new(provider: Arc<dyn VoiceProviderPort>, chunk_config: ChunkConfig) -> Self {
        Self {
            provider,
            chunk_config,
            max_in_flight: 1,
        }
    }

    /// 允许同时进行的上游调用数，结果仍按原顺序拼接
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub async fn handle(
        &self,
        command: SynthesizeSpeech,
    ) -> Result<SynthesizedAudio, ApplicationError> {
        let voice_id = VoiceId::new(command.voice_id)?;
        let chunks = chunk_text(&command.text, &self.chunk_config);
        let request_id = Uuid::new_v4();

        tracing::info!(
            request_id = %request_id,
            voice_id = %voice_id,
            text_chars = command.text.chars().count(),
            chunk_count = chunks.len(),
            max_in_flight = self.max_in_flight,
            "Synthesis started"
        );

        if chunks.is_empty() {
            return Ok(SynthesizedAudio::empty());
        }

        let audio_chunks = if self.max_in_flight <= 1 {
            self.synthesize_sequential(request_id, &voice_id, chunks)
                .await?
        } else {
            self.synthesize_buffered(request_id, &voice_id, chunks)
                .await?
        };

        let audio = SynthesizedAudio::concat(audio_chunks);

        tracing::info!(
            request_id = %request_id,
            chunk_count = audio.chunk_count,
            audio_size = audio.data.len(),
            "Synthesis completed"
        );

        Ok(audio)
    }

    async fn synthesize_sequential(
        &self,
        request_id: Uuid,
        voice_id: &VoiceId,
        chunks: Vec<TextChunk>,
    ) -> Result<Vec<AudioChunk>, ApplicationError> {
        let mut audio_chunks = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            audio_chunks.push(self.synthesize_chunk(request_id, voice_id, chunk).await?);
        }
        Ok(audio_chunks)
    }

    async fn synthesize_buffered(
        &self,
        request_id: Uuid,
        voice_id: &VoiceId,
        chunks: Vec<TextChunk>,
    ) -> Result<Vec<AudioChunk>, ApplicationError> {
        // buffered 按输入顺序产出结果，try_collect 在首个错误处停止
        stream::iter(chunks)
            .map(|chunk| self.synthesize_chunk(request_id, voice_id, chunk))
            .buffered(self.max_in_flight)
            .try_collect()
            .await
    }

    async fn synthesize_chunk(
        &self,
        request_id: Uuid,
        voice_id: &VoiceId,
        chunk: TextChunk,
    ) -> Result<AudioChunk, ApplicationError> {
        let index = chunk.index;
        let char_count = chunk.char_count();

        tracing::debug!(
            request_id = %request_id,
            chunk_index = index,
            chunk_chars = char_count,
            "Synthesizing chunk"
        );

        let audio = self
            .provider
            .synthesize(SynthesisRequest {
                voice_id: voice_id.clone(),
                index,
                text: chunk.content,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    request_id = %request_id,
                    chunk_index = index,
                    error = %e,
                    "Chunk synthesis failed, aborting request"
                );
                ApplicationError::from(e)
            })?;

        tracing::debug!(
            request_id = %request_id,
            chunk_index = index,
            audio_size = audio.data.len(),
            "Chunk synthesized"
        );

        Ok(AudioChunk { index, ..audio })
    }
}
