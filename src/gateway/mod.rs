//! One-shot client for the external text-generation service.
//!
//! Each request builds a single prompt, performs exactly one round trip and
//! maps every outcome into an [`InsightResult`]. There is no retry and no
//! streaming; callers decide whether to re-trigger.

pub mod prompts;
pub mod wire;

use tracing::{debug, info, warn};

use crate::chat::ChatMessage;
use crate::config::GatewayConfig;
use crate::error::InsightError;

pub use prompts::InsightPayload;
use wire::{GenerateRequest, CHAT_GENERATION, INSIGHT_GENERATION};

pub type InsightResult = Result<String, InsightError>;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct InsightGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl InsightGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(4)
            .build()?;
        if config.api_key.is_empty() {
            warn!("No API key configured; insight requests will be rejected upstream");
        }
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.config.endpoint, self.config.model)
    }

    pub async fn request_insight(
        &self,
        payload: &InsightPayload,
        context_label: &str,
    ) -> InsightResult {
        let prompt = prompts::build_insight_prompt(payload, context_label);
        info!("Requesting insight for '{}'", context_label);
        self.generate(&GenerateRequest::single_prompt(prompt, INSIGHT_GENERATION))
            .await
    }

    pub async fn request_chat_reply(&self, message: &str, history: &[ChatMessage]) -> InsightResult {
        let prompt = prompts::build_chat_prompt(message, history);
        info!("Requesting chat reply ({} context messages)", history.len());
        let request = GenerateRequest::single_prompt(prompt, CHAT_GENERATION)
            .with_safety("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE");
        self.generate(&request).await
    }

    async fn generate(&self, request: &GenerateRequest) -> InsightResult {
        debug!(
            "Prompt ({} chars) -> {}",
            request.prompt_text().map(str::len).unwrap_or(0),
            self.generate_url()
        );

        let resp = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            warn!("Generation API returned {}: {}", status, truncate(&body, 200));
            return Err(InsightError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                warn!("Generation API returned unparseable body: {}", e);
                return Err(InsightError::EmptyResponse);
            }
        };

        match wire::generated_text(&json) {
            Some(text) => Ok(text.to_string()),
            None => {
                warn!("Generation API response had no candidate text");
                Err(InsightError::EmptyResponse)
            }
        }
    }

    fn network_error(&self, e: reqwest::Error) -> InsightError {
        let cause = if e.is_timeout() {
            format!("request timed out after {}s", self.config.timeout.as_secs_f32())
        } else {
            e.to_string()
        };
        warn!("Generation request failed: {}", cause);
        InsightError::Network { cause }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
