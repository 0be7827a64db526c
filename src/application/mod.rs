//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 上游语音服务端口（VoiceProviderPort）
//! - commands: 克隆音色、文本转语音
//! - queries: 音色列表
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        CloneVoiceHandler, CloneVoiceResponse, SynthesizeSpeechHandler, SynthesizedAudio,
        DEFAULT_AUDIO_CONTENT_TYPE, DEFAULT_CLONE_DESCRIPTION,
    },
    CloneVoice, SynthesizeSpeech,
};

pub use error::ApplicationError;

pub use ports::{AudioChunk, CloneRequest, ProviderError, SynthesisRequest, VoiceProviderPort};

pub use queries::{handlers::ListVoicesHandler, ListVoices};
