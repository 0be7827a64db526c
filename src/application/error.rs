//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::ProviderError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 客户端请求字段缺失或不合法
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 上游返回非成功状态
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// 无法连接上游
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 上游调用超时
    #[error("Upstream timeout")]
    UpstreamTimeout,

    /// 上游响应无法解析
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ProviderError> for ApplicationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(msg) => Self::NetworkError(msg),
            ProviderError::Timeout => Self::UpstreamTimeout,
            ProviderError::Upstream { message, .. } => Self::UpstreamError(message),
            ProviderError::InvalidResponse(msg) => Self::ParseError(msg),
            ProviderError::InvalidRequest(msg) => Self::ValidationError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_passes_through_verbatim() {
        let err = ApplicationError::from(ProviderError::Upstream {
            status: 401,
            message: "Invalid voice".to_string(),
        });
        assert!(matches!(err, ApplicationError::UpstreamError(ref m) if m == "Invalid voice"));
    }

    #[test]
    fn test_timeout_is_distinct() {
        let err = ApplicationError::from(ProviderError::Timeout);
        assert!(matches!(err, ApplicationError::UpstreamTimeout));
    }

    #[test]
    fn test_voice_error_is_validation() {
        let err = ApplicationError::from(VoiceError::MissingName);
        assert!(matches!(err, ApplicationError::ValidationError(ref m) if m == "voice_name is required"));
    }
}
