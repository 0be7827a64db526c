//! Voice Context - 音色上下文
//!
//! 职责:
//! - 上游音色标识（不透明令牌）
//! - 克隆请求的名称与样本音频校验

mod errors;
mod value_objects;

pub use errors::VoiceError;
pub use value_objects::{AudioSample, SampleLimits, VoiceId, VoiceName, DEFAULT_ALLOWED_MIME_TYPES};
