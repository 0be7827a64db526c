//! TTS HTTP Handlers
//!
//! 同一次合成可以两种形式返回：data URL（JSON）或原始音频字节。

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use std::sync::Arc;

use crate::application::{SynthesizeSpeech, SynthesizedAudio};
use crate::infrastructure::http::dto::{TtsRequest, TtsUrlResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 文本转语音，返回 `data:` URL
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Json<TtsUrlResponse>, ApiError> {
    let audio = run_synthesis(&state, payload).await?;
    Ok(Json(TtsUrlResponse {
        url: to_data_url(&audio),
    }))
}

/// 文本转语音，直接返回音频字节
pub async fn synthesize_audio(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let audio = run_synthesis(&state, payload).await?;

    let disposition = format!(
        "attachment; filename=\"cloned-audio-{}.{}\"",
        Utc::now().timestamp_millis(),
        file_extension(&audio.content_type)
    );

    Ok((
        [
            (header::CONTENT_TYPE, audio.content_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.data,
    )
        .into_response())
}

async fn run_synthesis(
    state: &AppState,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<SynthesizedAudio, ApiError> {
    let Json(req) = payload.map_err(|e| {
        ApiError::rejected(e.status(), format!("Invalid JSON body: {}", e.body_text()))
    })?;

    let text = req
        .text
        .ok_or_else(|| ApiError::BadRequest("text is required".to_string()))?;
    let voice_id = req
        .voice_id
        .ok_or_else(|| ApiError::BadRequest("voice_id is required".to_string()))?;

    tracing::info!(
        text_length = text.chars().count(),
        voice_id = %voice_id,
        "Received TTS request"
    );

    let audio = state
        .synthesize_handler
        .handle(SynthesizeSpeech { voice_id, text })
        .await?;

    Ok(audio)
}

/// 去掉 Content-Type 参数，只保留 `type/subtype`
fn mime_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

fn to_data_url(audio: &SynthesizedAudio) -> String {
    format!(
        "data:{};base64,{}",
        mime_essence(&audio.content_type),
        STANDARD.encode(&audio.data)
    )
}

fn file_extension(content_type: &str) -> &'static str {
    match mime_essence(content_type) {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/flac" => "flac",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(data: &[u8], content_type: &str) -> SynthesizedAudio {
        SynthesizedAudio {
            data: data.to_vec(),
            content_type: content_type.to_string(),
            chunk_count: 1,
        }
    }

    #[test]
    fn test_data_url_encodes_audio() {
        assert_eq!(
            to_data_url(&audio(b"abc", "audio/mpeg")),
            "data:audio/mpeg;base64,YWJj"
        );
    }

    #[test]
    fn test_data_url_strips_mime_parameters() {
        assert_eq!(
            to_data_url(&audio(b"", "audio/mpeg; charset=binary")),
            "data:audio/mpeg;base64,"
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("audio/mpeg"), "mp3");
        assert_eq!(file_extension("audio/wav"), "wav");
        assert_eq!(file_extension("application/octet-stream"), "bin");
    }
}
