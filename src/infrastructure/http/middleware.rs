//! HTTP Middleware
//!
//! 请求标识与错误日志

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// 请求标识响应头
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 请求标识与错误日志中间件
///
/// 沿用客户端传入的 `x-request-id`，否则生成一个新的；处理过程中的日志都挂在
/// 带该标识的 span 下，响应头回写同一个标识。4xx / 5xx 响应按级别记录，
/// 包括不经过 ApiError 的框架层拒绝（路由不存在、请求体超限）。
pub async fn request_logging_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value.clone());
    }

    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    span.in_scope(|| {
        if status.is_server_error() {
            tracing::error!(
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                elapsed_ms,
                "HTTP server error"
            );
        } else if status.is_client_error() {
            tracing::warn!(
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                elapsed_ms,
                "HTTP client error"
            );
        }
    });

    if let Some(value) = header_value {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}
