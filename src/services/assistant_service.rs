// src/services/assistant_service.rs
// DOCUMENTATION: Chat assistant bridge
// PURPOSE: Forward one guest utterance to the generative model with the park
// persona and turn any outcome into an assistant ChatMessage

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::errors::SiteError;
use crate::models::{ChatMessage, GroundingSource};
use crate::services::gemini_client::GeminiError;

pub const SYSTEM_INSTRUCTION: &str = r#"You are the "Mountain View RV Assistant".
Your role is to help guests plan their stay at Mountain View RV Park in Van Horn, TX.
You can provide information about:
1. Park amenities (Wi-Fi, laundry, full hookups, pet-friendly policy).
2. Nearby attractions (Guadalupe Mountains National Park, McDonald Observatory, Marfa, Pratt Lodge).
3. Travel tips for RV owners traveling through West Texas.
4. Weather-related advice for high desert regions (cool nights, warm days).
5. Local dining recommendations in Van Horn (Chuy's Restaurant - Elvis shrine, Van Horn Cattle Co).

Be friendly, professional, and outdoors-focused. If asked about rates, refer them to the website's rates section (Daily $45, Weekly $250, Monthly $650).
Our location is Van Horn, TX, the gateway to the West Texas mountains."#;

pub const TEMPERATURE: f32 = 0.7;

/// Shown when the model cannot be reached
pub const APOLOGY: &str =
    "The assistant is currently taking a break. Please try again in a few moments.";

/// Shown when the model answers with no text
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that. How else can I help you today?";

/// Raw model answer before it becomes a ChatMessage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// Text generation seam
#[async_trait]
pub trait AssistantModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        search_grounding: bool,
        temperature: f32,
    ) -> Result<ModelReply, GeminiError>;
}

pub struct AssistantService {
    model: Option<Arc<dyn AssistantModel>>,
    search_grounding: bool,
    limiter: DefaultDirectRateLimiter,
}

impl AssistantService {
    /// DOCUMENTATION: `model` is None when no API key is configured; every
    /// chat then answers with the apology
    pub fn new(
        model: Option<Arc<dyn AssistantModel>>,
        search_grounding: bool,
        requests_per_minute: u32,
    ) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            model,
            search_grounding,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        }
    }

    /// Answer one utterance
    /// DOCUMENTATION: Only empty input and an exhausted quota are errors;
    /// model failures become the apology message
    pub async fn chat(&self, message: &str) -> Result<ChatMessage, SiteError> {
        let prompt = message.trim();
        if prompt.is_empty() {
            return Err(SiteError::ValidationError("message must not be empty".to_string()));
        }

        if self.limiter.check().is_err() {
            log::warn!("Assistant rate limit reached, rejecting chat request");
            return Err(SiteError::RateLimitExceeded);
        }

        let Some(model) = &self.model else {
            log::warn!("Assistant requested but no model is configured");
            return Ok(ChatMessage::assistant(APOLOGY, Vec::new()));
        };

        match model
            .generate(prompt, SYSTEM_INSTRUCTION, self.search_grounding, TEMPERATURE)
            .await
        {
            Ok(reply) if reply.text.trim().is_empty() => {
                Ok(ChatMessage::assistant(EMPTY_REPLY, reply.sources))
            }
            Ok(reply) => {
                log::debug!("Assistant replied with {} sources", reply.sources.len());
                Ok(ChatMessage::assistant(reply.text, reply.sources))
            }
            Err(e) => {
                log::error!("Assistant model error: {}", e);
                Ok(ChatMessage::assistant(APOLOGY, Vec::new()))
            }
        }
    }
}
