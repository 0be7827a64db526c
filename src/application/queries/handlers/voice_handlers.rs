//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceProviderPort;
use crate::application::queries::ListVoices;

/// ListVoices Handler
///
/// 原样返回上游的音色描述（结构由上游定义）
pub struct ListVoicesHandler {
    provider: Arc<dyn VoiceProviderPort>,
}

impl ListVoicesHandler {
    pub fn new(provider: Arc<dyn VoiceProviderPort>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        _query: ListVoices,
    ) -> Result<Vec<serde_json::Value>, ApplicationError> {
        let voices = self.provider.list_voices().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to list upstream voices");
            ApplicationError::from(e)
        })?;

        tracing::debug!(count = voices.len(), "Listed upstream voices");

        Ok(voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{handlers::CloneVoiceHandler, CloneVoice};
    use crate::domain::voice::SampleLimits;
    use crate::infrastructure::adapters::{FakeVoiceClient, FakeVoiceClientConfig};

    #[tokio::test]
    async fn test_lists_voices_from_provider() {
        let provider = Arc::new(FakeVoiceClient::new(FakeVoiceClientConfig::default()).unwrap());
        let clone_handler = CloneVoiceHandler::new(provider.clone(), SampleLimits::default());
        clone_handler
            .handle(CloneVoice {
                name: "Bob".to_string(),
                file_name: "bob.wav".to_string(),
                mime_type: "audio/wav".to_string(),
                data: vec![0; 16],
            })
            .await
            .unwrap();

        let handler = ListVoicesHandler::new(provider);
        let voices = handler.handle(ListVoices).await.unwrap();

        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0]["name"], "Bob");
    }
}
