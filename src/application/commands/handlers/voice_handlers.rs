//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::CloneVoice;
use crate::application::error::ApplicationError;
use crate::application::ports::{CloneRequest, VoiceProviderPort};
use crate::domain::voice::{AudioSample, SampleLimits, VoiceId, VoiceName};

/// 上游克隆请求中附带的默认描述
pub const DEFAULT_CLONE_DESCRIPTION: &str = "Custom cloned voice";

// ============================================================================
// CloneVoice
// ============================================================================

/// 克隆音色响应
#[derive(Debug, Clone)]
pub struct CloneVoiceResponse {
    pub voice_id: VoiceId,
}

/// CloneVoice Handler
///
/// 校验名称与样本后原样转发给上游，返回上游签发的音色标识。
pub struct CloneVoiceHandler {
    provider: Arc<dyn VoiceProviderPort>,
    limits: SampleLimits,
    description: String,
}

impl CloneVoiceHandler {
    pub fn new(provider: Arc<dyn VoiceProviderPort>, limits: SampleLimits) -> Self {
        Self {
            provider,
            limits,
            description: DEFAULT_CLONE_DESCRIPTION.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn limits(&self) -> &SampleLimits {
        &self.limits
    }

    pub async fn handle(&self, command: CloneVoice) -> Result<CloneVoiceResponse, ApplicationError> {
        let name = VoiceName::new(command.name)?;
        let sample = AudioSample::new(
            command.data,
            command.mime_type,
            command.file_name,
            &self.limits,
        )?;

        tracing::info!(
            name = %name,
            file_name = %sample.file_name(),
            mime_type = %sample.mime_type(),
            size = sample.len(),
            "Forwarding voice clone request"
        );

        let voice_id = self
            .provider
            .clone_voice(CloneRequest {
                name: name.clone(),
                description: self.description.clone(),
                sample,
            })
            .await
            .map_err(|e| {
                tracing::warn!(name = %name, error = %e, "Voice clone failed");
                ApplicationError::from(e)
            })?;

        tracing::info!(voice_id = %voice_id, name = %name, "Voice cloned");

        Ok(CloneVoiceResponse { voice_id })
    }
}
