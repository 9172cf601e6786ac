//! LUIS v2-style HTTP recognizer
//!
//! Calls `{endpoint}/luis/v2.0/apps/{app_id}` with the subscription key
//! and the utterance as query parameters, and maps the flat v2 entity
//! list onto booking entities. The model's entity types are `or_city`,
//! `dst_city`, `str_date`, `end_date` and `budget`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use booking_agent_core::{
    BookingEntities, BookingIntent, CoreError, Recognizer, RecognizerResult, Result,
};

use crate::NluError;

/// LUIS endpoint configuration.
#[derive(Debug, Clone)]
pub struct LuisConfig {
    /// LUIS application id
    pub app_id: String,
    /// Subscription key
    pub api_key: String,
    /// API host name, e.g. "westeurope.api.cognitive.microsoft.com"
    pub host: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LuisConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            host: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl LuisConfig {
    /// All three endpoint pieces must be present for the recognizer to be
    /// callable.
    pub fn is_complete(&self) -> bool {
        !self.app_id.is_empty() && !self.api_key.is_empty() && !self.host.is_empty()
    }
}

/// HTTP recognizer against a LUIS v2 endpoint.
#[derive(Clone)]
pub struct LuisRecognizer {
    client: Client,
    config: LuisConfig,
}

impl LuisRecognizer {
    pub fn new(config: LuisConfig) -> std::result::Result<Self, NluError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NluError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}/luis/v2.0/apps/{}",
            self.config.host, self.config.app_id
        )
    }

    async fn execute_query(&self, utterance: &str) -> std::result::Result<LuisResponse, NluError> {
        let response = self
            .client
            .get(self.query_url())
            .query(&[
                ("subscription-key", self.config.api_key.as_str()),
                ("verbose", "true"),
                ("q", utterance),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(NluError::Service { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| NluError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Recognizer for LuisRecognizer {
    fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult> {
        if !self.is_configured() {
            return Err(CoreError::RecognizerNotConfigured);
        }

        let response = self.execute_query(utterance).await.map_err(CoreError::from)?;
        let result = map_response(response);

        tracing::debug!(
            intent = result.intent.as_str(),
            score = result.score,
            "LUIS recognition"
        );

        Ok(result)
    }
}

fn map_response(response: LuisResponse) -> RecognizerResult {
    let (intent, score) = match response.top_scoring_intent {
        Some(top) => (parse_intent(&top.intent), top.score.unwrap_or(0.0)),
        None => (BookingIntent::None, 0.0),
    };

    let mut entities = BookingEntities::default();
    for entity in response.entities {
        let value = entity.entity;
        match entity.entity_type.as_str() {
            "dst_city" => fill_first(&mut entities.destination, title_case(&value)),
            "or_city" => fill_first(&mut entities.origin, title_case(&value)),
            "str_date" => fill_first(&mut entities.start_date, value),
            "end_date" => fill_first(&mut entities.end_date, value),
            "budget" => fill_first(&mut entities.budget, value),
            other => tracing::trace!(entity_type = other, "ignoring entity"),
        }
    }

    RecognizerResult { intent, score, entities }
}

fn parse_intent(name: &str) -> BookingIntent {
    match name.to_ascii_lowercase().as_str() {
        "book" => BookingIntent::Book,
        "cancel" => BookingIntent::Cancel,
        _ => BookingIntent::None,
    }
}

// The v2 endpoint lowercases entity text; city names are re-capitalized
// before they reach the user-facing summary.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

// LUIS v2 wire types

#[derive(Debug, Deserialize)]
struct LuisResponse {
    #[serde(rename = "topScoringIntent")]
    top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    entities: Vec<LuisEntity>,
}

#[derive(Debug, Deserialize)]
struct LuisIntent {
    intent: String,
    score: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct LuisEntity {
    entity: String,
    #[serde(rename = "type")]
    entity_type: String,
}
