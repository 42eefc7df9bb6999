use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::MindMirrorConfig;
use crate::errors::{GenerationError, GenerationResult};
use crate::types::*;

/// Anything that can turn a system prompt plus conversation into text.
///
/// The intent handlers only depend on this trait, so tests can swap in a
/// scripted generator instead of the network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        contents: &[ConversationTurn],
        generation_config: &GenerationConfig,
    ) -> GenerationResult<String>;
}

/// Client for the Gemini generateContent endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model_name: String,
    api_base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: &MindMirrorConfig) -> GenerationResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name: config.model_name().to_string(),
            api_base_url: config.api_base_url().to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    /// Send one request and return the decoded envelope
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest<'_>,
    ) -> GenerationResult<GenerateContentResponse> {
        debug!(
            model = %self.model_name,
            turns = request.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received generateContent response");

        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GenerationError::RequestError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GenerationError::HttpError {
                status_code: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::ParsingError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        contents: &[ConversationTurn],
        generation_config: &GenerationConfig,
    ) -> GenerationResult<String> {
        let request = GenerateContentRequest {
            system_instruction: SystemInstruction::new(system_prompt),
            contents,
            generation_config,
        };

        let response = self.generate_content(&request).await?;
        let text = response.first_candidate_text();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
