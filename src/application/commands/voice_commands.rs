//! Voice Commands

/// 克隆音色命令
///
/// 字段为客户端上传的原始内容，由 handler 负责校验。
#[derive(Debug, Clone)]
pub struct CloneVoice {
    pub name: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
