//! Keyword suggestions via the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shelf_core::config::KeywordConfig;
use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;
use shelf_core::traits::KeywordSuggester;

/// Characters of content sent to the model.
const CONTENT_PREVIEW_CHARS: usize = 500;

/// Longest keyword kept after sanitizing.
const MAX_KEYWORD_CHARS: usize = 20;

/// Token budget for the reply.
const MAX_TOKENS: u32 = 20;

const API_VERSION: &str = "2023-06-01";

/// Asks a model for the single word that best names a prompt's topic.
#[derive(Debug, Clone)]
pub struct AnthropicKeywordSuggester {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message; 1],
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl AnthropicKeywordSuggester {
    /// Creates a suggester. `None` when no API key is configured.
    pub fn new(config: &KeywordConfig) -> AppResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Some(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
        }))
    }
}

/// The instruction sent for one prompt.
fn build_instruction(title: &str, content: &str) -> String {
    let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    format!(
        "Answer with exactly one Korean word naming the core topic of the prompt below.\n\
         Translate to Korean even if the prompt is in English.\n\
         Reply with the word only, no explanation. (e.g. 번역, 요약, 코딩, 글쓰기, 분석)\n\n\
         Title: {title}\n\
         Content: {preview}"
    )
}

/// Keeps Hangul syllables, ASCII letters, digits, and `_`, capped at 20
/// characters. `None` when nothing is left.
pub fn sanitize_keyword(raw: &str) -> Option<String> {
    let keyword: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || ('\u{AC00}'..='\u{D7A3}').contains(c))
        .take(MAX_KEYWORD_CHARS)
        .collect();
    (!keyword.is_empty()).then_some(keyword)
}

#[async_trait]
impl KeywordSuggester for AnthropicKeywordSuggester {
    async fn suggest_keyword(&self, title: &str, content: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() && content.trim().is_empty() {
            return Ok(None);
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: build_instruction(title, content),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Keyword request failed", e)
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Keyword service returned an error");
            return Err(AppError::external_service(format!(
                "Keyword service responded with {}",
                response.status()
            )));
        }

        let reply: MessagesResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed keyword response", e)
        })?;

        let keyword = reply
            .content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| sanitize_keyword(&block.text));
        debug!(suggested = keyword.is_some(), "Keyword suggestion received");
        Ok(keyword)
    }
}
