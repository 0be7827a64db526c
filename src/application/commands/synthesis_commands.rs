//! Synthesis Commands

/// 文本转语音命令
#[derive(Debug, Clone)]
pub struct SynthesizeSpeech {
    pub voice_id: String,
    pub text: String,
}
