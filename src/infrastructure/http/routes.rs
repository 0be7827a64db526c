//! HTTP Routes
//!
//! API Endpoints:
//! - /api/clone      POST  上传样本并克隆音色
//! - /api/tts        POST  文本转语音（返回 data URL）
//! - /api/tts/audio  POST  文本转语音（返回音频字节）
//! - /api/voices     GET   上游音色列表
//! - /health         GET   存活探针

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clone", post(handlers::clone_voice))
        .route("/voices", get(handlers::list_voices))
        .route("/tts", post(handlers::synthesize))
        .route("/tts/audio", post(handlers::synthesize_audio))
}
