//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 客户端可见的网络错误信息
pub const NETWORK_FAILURE_MESSAGE: &str = "Network failure: could not reach the voice service";
/// 客户端可见的解析错误信息
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse upstream response";
/// 客户端可见的超时错误信息
pub const UPSTREAM_TIMEOUT_MESSAGE: &str = "Upstream timeout";

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Upstream(String),
    GatewayTimeout(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Upstream(msg)
            | ApiError::GatewayTimeout(msg) => msg,
        }
    }

    /// 提取器拒绝（请求体格式错误或超限）
    ///
    /// 超过请求体上限时保留 413，其余一律视为校验失败。
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message.into())
        } else {
            ApiError::BadRequest(message.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
            }
            ApiError::Upstream(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Upstream error");
            }
            ApiError::GatewayTimeout(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Upstream timeout");
            }
        }

        (status, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::UpstreamError(msg) => ApiError::Upstream(msg),
            ApplicationError::NetworkError(detail) => {
                tracing::warn!(detail = %detail, "Upstream unreachable");
                ApiError::Upstream(NETWORK_FAILURE_MESSAGE.to_string())
            }
            ApplicationError::UpstreamTimeout => {
                ApiError::GatewayTimeout(UPSTREAM_TIMEOUT_MESSAGE.to_string())
            }
            ApplicationError::ParseError(detail) => {
                tracing::warn!(detail = %detail, "Unparseable upstream response");
                ApiError::Upstream(PARSE_FAILURE_MESSAGE.to_string())
            }
        }
    }
}
