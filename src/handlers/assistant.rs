// src/handlers/assistant.rs
// DOCUMENTATION: HTTP handlers for the chat assistant
// PURPOSE: Stateless chat turns; the transcript lives in the client session

use crate::errors::SiteError;
use crate::models::{ChatMessage, ChatRequest};
use crate::services::AssistantService;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// POST /assistant/chat
pub async fn chat(
    assistant: web::Data<AssistantService>,
    body: web::Json<ChatRequest>,
) -> Result<impl Responder, SiteError> {
    if let Err(e) = body.validate() {
        return Err(SiteError::ValidationError(e.to_string()));
    }

    let reply = assistant.chat(&body.message).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// GET /assistant/greeting
pub async fn greeting() -> impl Responder {
    HttpResponse::Ok().json(ChatMessage::greeting())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assistant")
            .route("/chat", web::post().to(chat))
            .route("/greeting", web::get().to(greeting)),
    );
}
