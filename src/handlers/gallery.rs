// src/handlers/gallery.rs
// DOCUMENTATION: HTTP handlers for the image gallery
// PURPOSE: Parse requests, call the gallery service, return responses

use crate::config::Config;
use crate::errors::SiteError;
use crate::models::{
    CategorizeRequest, GalleryListQuery, GalleryListResponse, UpdateImageRequest,
    UploadImageQuery,
};
use crate::services::{GalleryService, ImageUpload, UploadTracker};
use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// GET /gallery/images
/// Stored images newest first, then the built-in seed images
pub async fn list_images(
    gallery: web::Data<GalleryService>,
    query: web::Query<GalleryListQuery>,
) -> Result<impl Responder, SiteError> {
    let query = query.into_inner();
    let images = gallery
        .list(query.category, query.include_seed.unwrap_or(true))
        .await?;

    Ok(HttpResponse::Ok().json(GalleryListResponse {
        total: images.len(),
        images,
    }))
}

/// POST /gallery/images?file_name=...&description=...&upload_id=...
/// Upload one image (raw body, media type from Content-Type)
pub async fn upload_image(
    gallery: web::Data<GalleryService>,
    req: HttpRequest,
    query: web::Query<UploadImageQuery>,
    body: web::Bytes,
) -> Result<impl Responder, SiteError> {
    if let Err(e) = query.validate() {
        return Err(SiteError::ValidationError(e.to_string()));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let query = query.into_inner();

    log::info!(
        "Gallery upload: {} ({}, {} bytes)",
        query.file_name,
        content_type,
        body.len()
    );

    let image = gallery
        .upload(ImageUpload {
            file_name: query.file_name,
            content_type,
            description: query.description,
            bytes: body.to_vec(),
            upload_id: query.upload_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(image))
}

/// PUT /gallery/images/{id}
/// Edit title, category or description (admin)
pub async fn update_image(
    gallery: web::Data<GalleryService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateImageRequest>,
) -> Result<impl Responder, SiteError> {
    verify_admin_token(&req, &config)?;

    if let Err(e) = body.validate() {
        return Err(SiteError::ValidationError(e.to_string()));
    }

    let image = gallery.update(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(image))
}

/// DELETE /gallery/images/{id}
/// Remove the record and its blob (admin)
pub async fn delete_image(
    gallery: web::Data<GalleryService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, SiteError> {
    verify_admin_token(&req, &config)?;

    gallery.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /gallery/categorize
/// Preview the category an upload would receive
pub async fn categorize(body: web::Json<CategorizeRequest>) -> Result<impl Responder, SiteError> {
    if let Err(e) = body.validate() {
        return Err(SiteError::ValidationError(e.to_string()));
    }

    Ok(HttpResponse::Ok().json(GalleryService::preview(&body)))
}

/// GET /gallery/uploads/{upload_id}
/// Poll an upload's progress
pub async fn upload_status(
    tracker: web::Data<Arc<UploadTracker>>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, SiteError> {
    let upload_id = path.into_inner();

    let status = tracker
        .get(upload_id)
        .await
        .ok_or_else(|| SiteError::NotFound(format!("upload {}", upload_id)))?;

    Ok(HttpResponse::Ok().json(status))
}

/// Verify admin token from request headers
/// DOCUMENTATION: Checks X-Admin-Token header against configured token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), SiteError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            SiteError::Unauthorized
        })?;

    if config.admin_token.is_empty() || token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(SiteError::Forbidden);
    }

    Ok(())
}

/// Configuration for gallery routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gallery")
            .route("/images", web::get().to(list_images))
            .route("/images", web::post().to(upload_image))
            .route("/images/{id}", web::put().to(update_image))
            .route("/images/{id}", web::delete().to(delete_image))
            .route("/categorize", web::post().to(categorize))
            .route("/uploads/{upload_id}", web::get().to(upload_status)),
    );
}
