use std::sync::Arc;

use async_trait::async_trait;
use openai_api_rs::v1::{
    api::OpenAIClient,
    chat_completion::{self, ChatCompletionRequest},
};
use tokio::sync::Mutex;

use crate::{error::SourceError, utils};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts artist names from festival lineups. Return only valid JSON.";

const EXTRACTION_PROMPT: &str = r#"Extract the names of musical artists and performers from this festival lineup text.

RULES:
1. Include ONLY musicians, DJs, bands, and musical performers
2. EXCLUDE talks, panels, workshops, readings, and conversations
3. For collaborative works or residencies, extract the main performing artist name(s)
4. Clean up names by removing:
   - Work titles (anything after colons or in quotes)
   - Text in parentheses like "(Live)" or "(cancelled)"
   - Phrases like "with the...", "& ensemble", etc. - keep only the main artist
5. For entries like "Artist Name: Work Title", return just "Artist Name"
6. Skip generic entries such as festival series names unless followed by a specific artist

Return ONLY a JSON array of artist names, nothing else. Example format:
["Artist 1", "Artist 2", "Artist 3"]

Festival lineup text:
"#;

/// Turns free-form lineup text into performer names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_artists(&self, text: &str) -> Result<Vec<String>, SourceError>;
}

/// [`TextExtractor`] backed by an OpenAI chat model.
pub struct OpenAiExtractor {
    client: Arc<Mutex<OpenAIClient>>,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(api_key: &str, model: impl Into<String>) -> Result<Self, SourceError> {
        let client = OpenAIClient::builder()
            .with_api_key(api_key)
            .build()
            .map_err(|e| {
                SourceError::Extraction(format!("Failed to create OpenAI client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(Mutex::new(client)),
            model: model.into(),
        })
    }

    fn message(
        role: chat_completion::MessageRole,
        content: String,
    ) -> chat_completion::ChatCompletionMessage {
        chat_completion::ChatCompletionMessage {
            role,
            content: chat_completion::Content::Text(content),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[async_trait]
impl TextExtractor for OpenAiExtractor {
    async fn extract_artists(&self, text: &str) -> Result<Vec<String>, SourceError> {
        let req = ChatCompletionRequest::new(
            self.model.clone(),
            vec![
                Self::message(
                    chat_completion::MessageRole::system,
                    SYSTEM_PROMPT.to_string(),
                ),
                Self::message(
                    chat_completion::MessageRole::user,
                    format!("{EXTRACTION_PROMPT}{text}"),
                ),
            ],
        )
        .temperature(0.3);

        let response = self
            .client
            .lock()
            .await
            .chat_completion(req)
            .await
            .map_err(|e| SourceError::Extraction(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| SourceError::Extraction("empty model response".to_string()))?;

        parse_artist_list(&content)
    }
}

/// Runs the extractor, degrading any failure to an empty list.
pub async fn extract_lineup(extractor: &dyn TextExtractor, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match extractor.extract_artists(text).await {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Lineup extraction failed: {}", e);
            Vec::new()
        }
    }
}

/// Removes a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parses a model reply holding a JSON array of names.
pub fn parse_artist_list(raw: &str) -> Result<Vec<String>, SourceError> {
    let payload = strip_code_fences(raw);
    let names: Vec<String> = serde_json::from_str(payload).map_err(|e| {
        let preview: String = payload.chars().take(200).collect();
        SourceError::Extraction(format!("{e} in response: {preview}"))
    })?;
    Ok(utils::dedupe_names(names))
}
