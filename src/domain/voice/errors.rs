//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("voice_id is required")]
    MissingVoiceId,

    #[error("voice_name is required")]
    MissingName,

    #[error("voice_name must not exceed {max} characters")]
    NameTooLong { max: usize },

    #[error("sample_file is empty")]
    EmptySample,

    #[error("Unsupported audio type: {0}. Please upload a WAV, MP3 or M4A file")]
    UnsupportedMimeType(String),

    #[error("Audio file must not exceed {max_bytes} bytes (got {actual_bytes})")]
    SampleTooLarge { max_bytes: u64, actual_bytes: u64 },
}
