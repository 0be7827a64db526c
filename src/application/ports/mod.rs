//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod voice_provider;

pub use voice_provider::{
    AudioChunk, CloneRequest, ProviderError, SynthesisRequest, VoiceProviderPort,
};
