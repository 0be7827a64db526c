//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 默认允许上传的样本 MIME 类型
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/mp3",
    "audio/mpeg",
    "audio/m4a",
    "audio/x-m4a",
    "audio/mp4",
];

/// 上游音色标识
///
/// 由上游服务签发的不透明令牌，中继只做透传，不假设任何内部结构。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Result<Self, VoiceError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(VoiceError::MissingVoiceId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色显示名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub const MAX_CHARS: usize = 100;

    pub fn new(name: impl Into<String>) -> Result<Self, VoiceError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(VoiceError::MissingName);
        }
        if name.chars().count() > Self::MAX_CHARS {
            return Err(VoiceError::NameTooLong {
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 样本校验限制
#[derive(Debug, Clone)]
pub struct SampleLimits {
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// 克隆用的样本音频
///
/// 只在一次克隆请求内存在，转发后即丢弃，从不落盘。
///
/// 不变量:
/// - 数据非空且不超过 `SampleLimits::max_bytes`
/// - MIME 类型在允许列表内
#[derive(Clone)]
pub struct AudioSample {
    data: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl AudioSample {
    pub fn new(
        data: Vec<u8>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
        limits: &SampleLimits,
    ) -> Result<Self, VoiceError> {
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        // 忽略 "audio/mpeg; codecs=..." 之类的参数
        let essence = mime_type.split(';').next().unwrap_or_default().trim().to_string();

        if !limits.allowed_mime_types.iter().any(|m| m.eq_ignore_ascii_case(&essence)) {
            return Err(VoiceError::UnsupportedMimeType(mime_type));
        }
        if data.is_empty() {
            return Err(VoiceError::EmptySample);
        }
        let actual_bytes = data.len() as u64;
        if actual_bytes > limits.max_bytes {
            return Err(VoiceError::SampleTooLarge {
                max_bytes: limits.max_bytes,
                actual_bytes,
            });
        }

        let file_name = file_name.into();
        let file_name = if file_name.trim().is_empty() {
            "sample".to_string()
        } else {
            file_name
        };

        Ok(Self {
            data,
            mime_type: essence,
            file_name,
        })
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for AudioSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSample")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_id_rejects_blank() {
        assert_eq!(VoiceId::new("  "), Err(VoiceError::MissingVoiceId));
        assert_eq!(VoiceId::new("abc123").unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_voice_id_is_opaque() {
        let id = VoiceId::new("weird/id with spaces").unwrap();
        assert_eq!(id.to_string(), "weird/id with spaces");
    }

    #[test]
    fn test_voice_name_trims_and_limits() {
        assert_eq!(VoiceName::new(" Alice ").unwrap().as_str(), "Alice");
        assert_eq!(VoiceName::new(""), Err(VoiceError::MissingName));
        assert!(matches!(
            VoiceName::new("名".repeat(101)),
            Err(VoiceError::NameTooLong { max: 100 })
        ));
        assert!(VoiceName::new("名".repeat(100)).is_ok());
    }

    #[test]
    fn test_sample_accepts_allowed_type() {
        let sample =
            AudioSample::new(vec![1, 2, 3], "audio/MPEG", "me.mp3", &SampleLimits::default())
                .unwrap();
        assert_eq!(sample.mime_type(), "audio/mpeg");
        assert_eq!(sample.file_name(), "me.mp3");
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_sample_ignores_mime_parameters() {
        let sample = AudioSample::new(
            vec![1],
            "audio/wav; codecs=1",
            "a.wav",
            &SampleLimits::default(),
        )
        .unwrap();
        assert_eq!(sample.mime_type(), "audio/wav");
    }

    #[test]
    fn test_sample_rejects_unsupported_type() {
        let err = AudioSample::new(vec![1], "video/mp4", "a.mp4", &SampleLimits::default())
            .unwrap_err();
        assert!(matches!(err, VoiceError::UnsupportedMimeType(_)));
    }

    #[test]
    fn test_sample_rejects_empty_and_oversized() {
        let limits = SampleLimits {
            max_bytes: 4,
            ..SampleLimits::default()
        };
        assert_eq!(
            AudioSample::new(vec![], "audio/wav", "a.wav", &limits).unwrap_err(),
            VoiceError::EmptySample
        );
        assert_eq!(
            AudioSample::new(vec![0; 5], "audio/wav", "a.wav", &limits).unwrap_err(),
            VoiceError::SampleTooLarge {
                max_bytes: 4,
                actual_bytes: 5
            }
        );
    }

    #[test]
    fn test_sample_defaults_file_name() {
        let sample =
            AudioSample::new(vec![1], "audio/wav", "", &SampleLimits::default()).unwrap();
        assert_eq!(sample.file_name(), "sample");
    }
}
