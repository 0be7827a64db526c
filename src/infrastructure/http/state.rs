//! Application State
//!
//! 所有 Command/Query Handlers 共享同一个上游 provider；状态创建后不可变。

use std::sync::Arc;

use crate::application::{
    CloneVoiceHandler, ListVoicesHandler, SynthesizeSpeechHandler, VoiceProviderPort,
    DEFAULT_CLONE_DESCRIPTION,
};
use crate::config::AppConfig;
use crate::domain::voice::SampleLimits;
use crate::domain::ChunkConfig;

/// 中继行为参数
#[derive(Debug, Clone)]
pub struct RelayOptions {
    pub chunk_config: ChunkConfig,
    pub max_in_flight: usize,
    pub sample_limits: SampleLimits,
    pub clone_description: String,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            chunk_config: ChunkConfig::default(),
            max_in_flight: 1,
            sample_limits: SampleLimits::default(),
            clone_description: DEFAULT_CLONE_DESCRIPTION.to_string(),
        }
    }
}

impl RelayOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chunk_config: config.synthesis.chunk_config(),
            max_in_flight: config.synthesis.max_in_flight,
            sample_limits: config.limits.sample_limits(),
            clone_description: config.clone.description.clone(),
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub clone_voice_handler: CloneVoiceHandler,
    pub synthesize_handler: SynthesizeSpeechHandler,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(provider: Arc<dyn VoiceProviderPort>, options: RelayOptions) -> Self {
        Self {
            clone_voice_handler: CloneVoiceHandler::new(provider.clone(), options.sample_limits)
                .with_description(options.clone_description),
            synthesize_handler: SynthesizeSpeechHandler::new(
                provider.clone(),
                options.chunk_config,
            )
            .with_max_in_flight(options.max_in_flight),
            list_voices_handler: ListVoicesHandler::new(provider),
        }
    }

    /// 允许上传的最大样本字节数
    pub fn max_upload_bytes(&self) -> u64 {
        self.clone_voice_handler.limits().max_bytes
    }
}
