//! Voice HTTP Handlers

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::{CloneVoice, ListVoices};
use crate::infrastructure::http::dto::CloneVoiceResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 克隆音色
///
/// multipart 字段：`voice_name`（文本）、`sample_file`（音频文件）
pub async fn clone_voice(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CloneVoiceResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        ApiError::rejected(e.status(), format!("Expected multipart form data: {}", e.body_text()))
    })?;

    let mut name: Option<String> = None;
    let mut sample: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::rejected(e.status(), format!("Failed to read multipart field: {}", e.body_text()))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "voice_name" => {
                name = Some(field.text().await.map_err(|e| {
                    ApiError::rejected(
                        e.status(),
                        format!("Failed to read voice_name: {}", e.body_text()),
                    )
                })?);
            }
            "sample_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        ApiError::rejected(
                            e.status(),
                            format!("Failed to read sample_file: {}", e.body_text()),
                        )
                    })?
                    .to_vec();
                sample = Some((file_name, mime_type, data));
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ApiError::BadRequest("voice_name is required".to_string()))?;
    let (file_name, mime_type, data) =
        sample.ok_or_else(|| ApiError::BadRequest("sample_file is required".to_string()))?;

    tracing::info!(
        name = %name,
        file_name = %file_name,
        mime_type = %mime_type,
        size = data.len(),
        "Received clone request"
    );

    let result = state
        .clone_voice_handler
        .handle(CloneVoice {
            name,
            file_name,
            mime_type,
            data,
        })
        .await?;

    Ok(Json(CloneVoiceResponse::completed(result.voice_id.into_inner())))
}

/// 获取上游音色列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let voices = state.list_voices_handler.handle(ListVoices).await?;
    Ok(Json(voices))
}
