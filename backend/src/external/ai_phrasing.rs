//! AI Reasoning Phrasing Client
//!
//! Client for the text-generation service that phrases forecast rationale.
//! The service receives the computed numeric facts and returns prose
//! restating them; it never influences the numbers. Callers fall back to the
//! templated reasoning when the service is unavailable.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::forecast::ForecastFacts;
use std::time::Duration;

use crate::config::AiConfig;
use crate::error::{AppError, AppResult};

/// Client for the AI phrasing microservice
#[derive(Clone)]
pub struct AiPhrasingClient {
    api_endpoint: String,
    api_key: String,
    http_client: Client,
}

/// Request to phrase a forecast rationale
#[derive(Debug, Serialize)]
pub struct PhraseReasoningRequest<'a> {
    /// The only material the service may state
    pub facts: &'a ForecastFacts,
    /// BCP 47 language code for the response text
    pub language: &'a str,
}

/// Response from the phrasing API
#[derive(Debug, Deserialize)]
pub struct PhraseReasoningResponse {
    pub reasoning: String,
}

impl AiPhrasingClient {
    /// Create a new AI phrasing client
    pub fn new(api_endpoint: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            http_client,
        })
    }

    /// Create a client from the optional config section
    pub fn from_config(config: Option<&AiConfig>) -> Option<Self> {
        let config = config?;
        Self::new(
            config.api_endpoint.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
        .ok()
    }

    /// Ask the service to phrase the forecast facts
    pub async fn phrase_reasoning(&self, facts: &ForecastFacts, language: &str) -> AppResult<String> {
        let request = PhraseReasoningRequest { facts, language };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiPhrasingError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AiPhrasingError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: PhraseReasoningResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiPhrasingError(format!("Failed to parse response: {}", e)))?;

        Ok(result.reasoning)
    }

    /// Phrase with one retry before giving up
    pub async fn phrase_with_retry(&self, facts: &ForecastFacts, language: &str) -> AppResult<String> {
        match self.phrase_reasoning(facts, language).await {
            Ok(reasoning) => Ok(reasoning),
            Err(first_err) => {
                tracing::warn!("AI phrasing failed, retrying once: {}", first_err);
                self.phrase_reasoning(facts, language).await
            }
        }
    }
}
