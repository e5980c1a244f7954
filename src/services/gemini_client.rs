// src/services/gemini_client.rs
// DOCUMENTATION: Gemini generative AI client
// PURPOSE: Text generation (optionally search-grounded) and image categorization

use async_trait::async_trait;
use base64::prelude::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{Category, GroundingSource};
use crate::services::assistant_service::{AssistantModel, ModelReply};
use crate::services::gallery_service::{VisionCategorizer, VisionSuggestion};

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not parse Gemini response: {0}")]
    Parse(String),

    #[error("Gemini returned no candidates")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Clone)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String, // base64 encoded data
}

#[derive(Debug, Serialize, Default)]
pub struct GoogleSearch {}

#[derive(Debug, Serialize)]
pub struct Tool {
    #[serde(rename = "googleSearch")]
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    #[serde(rename = "groundingMetadata")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response parts may carry fields we never read (thought signatures etc.)
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Web citations of the first candidate; chunks with neither title nor uri are dropped
    pub fn sources(&self) -> Vec<GroundingSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter(|web| web.title.is_some() || web.uri.is_some())
                    .map(|web| GroundingSource {
                        title: web.title.clone(),
                        uri: web.uri.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

const VISION_PROMPT: &str = "You are cataloguing photos for an RV park website gallery. \
Classify this image into exactly one category: Park (RV sites, pads, hookups, roads inside \
the park), Scenery (mountains, desert, sky, sunsets, landscapes), Facilities (laundry, \
restrooms, showers, office, buildings) or General (anything else: pets, people, events). \
Also propose a short title (max 6 words) and a one-sentence description.";

fn vision_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "category": {
                "type": "STRING",
                "enum": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>()
            },
            "title": { "type": "STRING" },
            "description": { "type": "STRING" }
        },
        "required": ["category", "title", "description"]
    })
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        log::debug!(
            "Gemini request: model={}, parts={}, tools={}",
            self.model,
            request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            request.tools.is_some()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini API request failed: {}", e);
                GeminiError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error {}: {}", status, body);
            return Err(GeminiError::Api { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Gemini response: {}", e);
            GeminiError::Parse(e.to_string())
        })?;

        if parsed.candidates.is_empty() {
            return Err(GeminiError::Empty);
        }

        Ok(parsed)
    }

    fn user_text(text: &str) -> Content {
        Content {
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
            role: Some("user".to_string()),
        }
    }
}

#[async_trait]
impl AssistantModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        search_grounding: bool,
        temperature: f32,
    ) -> Result<ModelReply, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Self::user_text(prompt)],
            system_instruction: Some(Content {
                parts: vec![Part::Text {
                    text: system_instruction.to_string(),
                }],
                role: None,
            }),
            tools: search_grounding.then(|| {
                vec![Tool {
                    google_search: GoogleSearch::default(),
                }]
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(temperature),
                ..Default::default()
            }),
        };

        let response = self.generate_content(&request).await?;

        Ok(ModelReply {
            text: response.text(),
            sources: response.sources(),
        })
    }
}

#[async_trait]
impl VisionCategorizer for GeminiClient {
    async fn suggest(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<VisionSuggestion, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: content_type.to_string(),
                            data: BASE64_STANDARD.encode(image),
                        },
                    },
                    Part::Text {
                        text: VISION_PROMPT.to_string(),
                    },
                ],
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            tools: None,
            generation_config: Some(GenerationConfig {
                temperature: Some(0.2),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(vision_schema()),
            }),
        };

        let response = self.generate_content(&request).await?;
        parse_vision_suggestion(&response.text())
    }
}

/// Parse the structured vision answer; tolerates a fenced ```json block
pub fn parse_vision_suggestion(text: &str) -> Result<VisionSuggestion, GeminiError> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(trimmed).map_err(|e| GeminiError::Parse(e.to_string()))
}
