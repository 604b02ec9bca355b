//! Gemini provider implementation
//!
//! This module implements the ChatProvider trait against the Gemini
//! `generateContent` REST endpoint. It owns the pure transforms of a turn
//! (history projection, request building, reply extraction) plus the
//! single network call between them.
//!
//! The request model is stateless: the provider holds no session state, so
//! the full conversation history is replayed in every request. That trades
//! bandwidth for simplicity and avoids provider-side session bugs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::config::{ModelConfig, ProviderConfig};
use crate::error::{NexusError, Result};
use crate::message::{ChatMessage, GroundingChunk, Role, TokenUsage};
use crate::prompts::SYSTEM_INSTRUCTION;
use crate::providers::{ChatProvider, ModelReply};

/// A known Gemini model and its display label
#[derive(Debug, Clone, Copy)]
pub struct KnownModel {
    /// Model identifier as sent on the wire
    pub name: &'static str,
    /// Human-readable label for catalog listings
    pub label: &'static str,
}

/// Catalog of models the client knows about
///
/// Selection is not restricted to this list; any model name is sent
/// verbatim. The catalog only feeds the `models` command and tab-complete
/// hints.
pub const KNOWN_MODELS: &[KnownModel] = &[
    KnownModel {
        name: "gemini-2.5-flash",
        label: "Gemini 2.5 Flash (Fast & Efficient)",
    },
    KnownModel {
        name: "gemini-3-pro-preview",
        label: "Gemini 3.0 Pro (Reasoning & Complex)",
    },
    KnownModel {
        name: "gemini-2.5-flash-image",
        label: "Gemini 2.5 Flash Image (Vision)",
    },
];

// ---------------------------------------------------------------------------
// Wire format (request)
// ---------------------------------------------------------------------------

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Fixed system instruction; travels outside the content history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Projected history plus the new user turn
    pub contents: Vec<Content>,
    /// Sampling and thinking configuration
    pub generation_config: GenerationConfig,
    /// Search grounding, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// System instruction payload (role-less content)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// One conversation turn on the wire: a role and its ordered parts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A single content part: inline binary data or text
///
/// Within one turn all inline-data parts precede the text part; that
/// ordering is a provider convention and is preserved exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// An inline-data part carrying a base64 payload
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload plus mime type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Generation parameters for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    /// Deliberately absent by default; when thinking is enabled the
    /// provider then allocates the remaining context to reasoning output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Thinking-budget directive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

/// Tool directive; only search grounding is used
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

/// Marker for the provider-side web search tool; serializes to `{}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleSearch {}

// ---------------------------------------------------------------------------
// Wire format (response)
// ---------------------------------------------------------------------------

/// Response body from `generateContent`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One response candidate; only the first is consumed
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Candidate content parts
#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A response part; non-text parts are ignored
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Search grounding metadata for a candidate
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// Token usage counters
///
/// Counters missing from a present object default to zero; a wholly absent
/// object stays absent (see [`extract_reply`]).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

// ---------------------------------------------------------------------------
// Pure transforms
// ---------------------------------------------------------------------------

/// Projects the message log into wire content blocks
///
/// Rules, applied in order:
/// 1. System-role messages are dropped; the system instruction travels in
///    its dedicated request field.
/// 2. Each remaining message emits one block in original order: one
///    inline-data part per attachment (attachment order), then one text
///    part iff the text is non-empty.
/// 3. A message with no attachments and empty text produces an empty parts
///    list and is NOT dropped; the provider tolerates empty parts.
///
/// No reordering, deduplication, or truncation occurs.
pub fn project_history(messages: &[ChatMessage]) -> Vec<Content> {
    messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| turn_content(m.role, &m.text, &m.attachments))
        .collect()
}

/// Builds the wire block for a single turn
fn turn_content(role: Role, text: &str, attachments: &[Attachment]) -> Content {
    let mut parts: Vec<Part> = attachments
        .iter()
        .map(|a| Part::inline_data(&a.mime_type, &a.data))
        .collect();
    if !text.is_empty() {
        parts.push(Part::text(text));
    }
    Content {
        role: role.as_str().to_string(),
        parts,
    }
}

/// Compiles a full turn into a request body
///
/// Pure data transformation: identical arguments always yield a
/// structurally identical request, and nothing here can fail. The thinking
/// directive is included iff `use_thinking` is true and the budget is
/// positive; the search tool iff `use_search`. The model name is taken
/// verbatim from the configuration elsewhere; no substitution happens here.
///
/// # Examples
///
/// ```
/// use nexus::config::ModelConfig;
/// use nexus::providers::gemini::build_request;
///
/// let request = build_request(&[], "Hello", &[], &ModelConfig::default());
/// assert_eq!(request.contents.len(), 1);
/// assert!(request.tools.is_none());
/// ```
pub fn build_request(
    history: &[ChatMessage],
    new_text: &str,
    new_attachments: &[Attachment],
    config: &ModelConfig,
) -> GenerateContentRequest {
    let mut contents = project_history(history);
    contents.push(turn_content(Role::User, new_text, new_attachments));

    let thinking_config = if config.use_thinking && config.thinking_budget > 0 {
        Some(ThinkingConfig {
            thinking_budget: config.thinking_budget,
        })
    } else {
        None
    };

    let tools = config.use_search.then(|| {
        vec![Tool {
            google_search: GoogleSearch {},
        }]
    });

    GenerateContentRequest {
        system_instruction: Some(SystemInstruction {
            parts: vec![Part::text(SYSTEM_INSTRUCTION)],
        }),
        contents,
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            thinking_config,
        },
        tools,
    }
}

/// Normalizes a wire response into a [`ModelReply`]
///
/// Text is the concatenation of the first candidate's text parts. Usage is
/// mapped only when the provider supplied a usage object at all; it is
/// never zero-filled from a missing object. Grounding chunks come from the
/// first candidate and are omitted when absent or empty.
pub fn extract_reply(response: GenerateContentResponse) -> ModelReply {
    let usage = response.usage_metadata.map(|u| TokenUsage {
        prompt_tokens: u.prompt_token_count,
        candidates_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    let mut candidates = response.candidates;
    let first = if candidates.is_empty() {
        None
    } else {
        Some(candidates.swap_remove(0))
    };

    let (text, grounding_chunks) = match first {
        Some(candidate) => {
            let text = candidate
                .content
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<Vec<_>>()
                        .concat()
                })
                .unwrap_or_default();
            let grounding = candidate
                .grounding_metadata
                .map(|g| g.grounding_chunks)
                .filter(|chunks| !chunks.is_empty());
            (text, grounding)
        }
        None => (String::new(), None),
    };

    ModelReply {
        text,
        usage,
        grounding_chunks,
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gemini API provider
///
/// An explicitly constructed client handle: the API key is resolved by the
/// caller (see [`crate::providers::credentials`]) and passed in, never read
/// from ambient global state.
///
/// # Examples
///
/// ```
/// use nexus::config::ProviderConfig;
/// use nexus::providers::GeminiProvider;
///
/// let provider = GeminiProvider::new(&ProviderConfig::default(), "test-key");
/// assert!(provider.is_ok());
/// ```
pub struct GeminiProvider {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint configuration (base URL, timeout)
    /// * `api_key` - API key sent in the `x-goog-api-key` header
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("nexus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NexusError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: api_base={}", config.api_base);

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn generate(
        &self,
        history: &[ChatMessage],
        new_text: &str,
        attachments: &[Attachment],
        config: &ModelConfig,
    ) -> Result<ModelReply> {
        let request = build_request(history, new_text, attachments, config);
        let url = self.generate_url(&config.model_name);

        tracing::debug!(
            "Sending Gemini request: model={}, {} content blocks, search={}, thinking={}",
            config.model_name,
            request.contents.len(),
            request.tools.is_some(),
            request.generation_config.thinking_config.is_some()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                NexusError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(NexusError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            NexusError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        Ok(extract_reply(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attachment(mime: &str, data: &str) -> Attachment {
        Attachment {
            mime_type: mime.to_string(),
            data: data.to_string(),
            preview: None,
        }
    }

    #[test]
    fn test_projection_preserves_order_and_drops_system() {
        let messages = vec![
            ChatMessage::system("You are terse."),
            ChatMessage::user("first", Vec::new()),
            ChatMessage::model("second", None),
            ChatMessage::user("third", Vec::new()),
        ];

        let contents = project_history(&messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text.as_deref(), Some("first"));
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].parts[0].text.as_deref(), Some("third"));
    }

    #[test]
    fn test_projection_attachments_before_text() {
        let messages = vec![ChatMessage::user(
            "look at these",
            vec![
                attachment("image/png", "AAAA"),
                attachment("image/jpeg", "BBBB"),
            ],
        )];

        let contents = project_history(&messages);
        let parts = &contents[0].parts;
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[0].inline_data.as_ref().unwrap().mime_type,
            "image/png"
        );
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, "BBBB");
        assert_eq!(parts[2].text.as_deref(), Some("look at these"));
    }

    #[test]
    fn test_projection_empty_message_keeps_empty_parts() {
        let messages = vec![ChatMessage::user("", Vec::new())];
        let contents = project_history(&messages);
        assert_eq!(contents.len(), 1);
        assert!(contents[0].parts.is_empty());
    }

    #[test]
    fn test_build_request_simple_turn() {
        // history = [], text = "Hello", no attachments, no search:
        // one user block with a single text part, no tools, no thinking.
        let config = ModelConfig::default();
        let request = build_request(&[], "Hello", &[], &config);

        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[0].parts.len(), 1);
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("Hello"));
        assert!(
            (request.generation_config.temperature - config.temperature).abs() < f32::EPSILON
        );
        assert!(request.tools.is_none());
        assert!(request.generation_config.thinking_config.is_none());
        assert!(request.system_instruction.is_some());
    }

    #[test]
    fn test_build_request_attachment_only_turn_with_thinking() {
        // history = [model "Hi"], empty text, one image, thinking budget 512.
        let history = vec![ChatMessage::model("Hi", None)];
        let config = ModelConfig {
            use_thinking: true,
            thinking_budget: 512,
            ..Default::default()
        };
        let request = build_request(&history, "", &[attachment("image/png", "AAAA")], &config);

        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role, "model");
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("Hi"));
        assert_eq!(request.contents[1].role, "user");
        assert_eq!(request.contents[1].parts.len(), 1);
        assert!(request.contents[1].parts[0].inline_data.is_some());
        assert_eq!(
            request
                .generation_config
                .thinking_config
                .as_ref()
                .unwrap()
                .thinking_budget,
            512
        );
    }

    #[test]
    fn test_thinking_directive_gating() {
        // Included iff use_thinking && thinking_budget > 0.
        let cases = [
            (false, 0, false),
            (false, 512, false),
            (true, 0, false),
            (true, 512, true),
        ];
        for (use_thinking, budget, expected) in cases {
            let config = ModelConfig {
                use_thinking,
                thinking_budget: budget,
                ..Default::default()
            };
            let request = build_request(&[], "x", &[], &config);
            assert_eq!(
                request.generation_config.thinking_config.is_some(),
                expected,
                "use_thinking={}, budget={}",
                use_thinking,
                budget
            );
        }
    }

    #[test]
    fn test_search_tool_gating() {
        let without = build_request(&[], "x", &[], &ModelConfig::default());
        assert!(without.tools.is_none());

        let config = ModelConfig {
            use_search: true,
            ..Default::default()
        };
        let with = build_request(&[], "x", &[], &config);
        assert_eq!(with.tools.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_build_request_is_pure() {
        let history = vec![
            ChatMessage::user("q", vec![attachment("image/png", "AAAA")]),
            ChatMessage::model("a", None),
        ];
        let config = ModelConfig {
            use_search: true,
            use_thinking: true,
            thinking_budget: 256,
            ..Default::default()
        };

        let first = build_request(&history, "again", &[], &config);
        let second = build_request(&history, "again", &[], &config);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_max_output_tokens_passthrough() {
        let config = ModelConfig {
            max_output_tokens: Some(2048),
            ..Default::default()
        };
        let request = build_request(&[], "x", &[], &config);
        assert_eq!(request.generation_config.max_output_tokens, Some(2048));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(2048));
    }

    #[test]
    fn test_wire_serialization_uses_camel_case() {
        let config = ModelConfig {
            use_search: true,
            use_thinking: true,
            thinking_budget: 128,
            ..Default::default()
        };
        let request = build_request(&[], "hi", &[attachment("image/png", "AAAA")], &config);
        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("systemInstruction").is_some());
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            json!(128)
        );
        assert_eq!(body["tools"][0]["googleSearch"], json!({}));
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/png"));
        assert_eq!(parts[0]["inlineData"]["data"], json!("AAAA"));
        assert_eq!(parts[1]["text"], json!("hi"));
        // maxOutputTokens stays absent unless explicitly configured.
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_extract_reply_concatenates_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        }))
        .unwrap();

        let reply = extract_reply(response);
        assert_eq!(reply.text, "Hello world");
        assert!(reply.usage.is_none());
        assert!(reply.grounding_chunks.is_none());
    }

    #[test]
    fn test_extract_reply_no_candidates() {
        let reply = extract_reply(GenerateContentResponse::default());
        assert!(reply.text.is_empty());
        assert!(reply.usage.is_none());
    }

    #[test]
    fn test_extract_reply_usage_counters_default_within_object() {
        // A present usage object with missing counters zero-fills them.
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [],
            "usageMetadata": { "promptTokenCount": 12 }
        }))
        .unwrap();

        let usage = extract_reply(response).usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.candidates_tokens, 0);
        assert_eq!(usage.total_tokens, 0);
    }

    #[test]
    fn test_extract_reply_absent_usage_stays_absent() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        }))
        .unwrap();

        assert!(extract_reply(response).usage.is_none());
    }

    #[test]
    fn test_extract_reply_grounding_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "grounded answer" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com", "title": "Example" } },
                        {}
                    ]
                }
            }]
        }))
        .unwrap();

        let chunks = extract_reply(response).grounding_chunks.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].web.as_ref().unwrap().title, "Example");
        assert!(chunks[1].web.is_none());
    }

    #[test]
    fn test_extract_reply_empty_grounding_omitted() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "plain" }] },
                "groundingMetadata": { "groundingChunks": [] }
            }]
        }))
        .unwrap();

        assert!(extract_reply(response).grounding_chunks.is_none());
    }

    #[test]
    fn test_generate_url() {
        let config = ProviderConfig {
            api_base: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let provider = GeminiProvider::new(&config, "key").unwrap();
        assert_eq!(
            provider.generate_url("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_known_models_catalog() {
        assert!(KNOWN_MODELS.iter().any(|m| m.name == "gemini-2.5-flash"));
        assert!(KNOWN_MODELS.iter().all(|m| !m.label.is_empty()));
    }
}
