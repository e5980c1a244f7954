// src/handlers/content.rs
// DOCUMENTATION: Static park content
// PURPOSE: Serve amenities, rates and park info to the site

use crate::models::{AMENITIES, PARK_INFO, RATES, SITE_TABS};
use actix_web::{web, HttpResponse, Responder};

/// GET /content/amenities
pub async fn list_amenities() -> impl Responder {
    HttpResponse::Ok().json(&AMENITIES[..])
}

/// GET /content/rates
pub async fn list_rates() -> impl Responder {
    HttpResponse::Ok().json(&RATES[..])
}

/// GET /content/park
pub async fn park_info() -> impl Responder {
    HttpResponse::Ok().json(&PARK_INFO)
}

/// GET /content/tabs
pub async fn list_tabs() -> impl Responder {
    HttpResponse::Ok().json(&SITE_TABS[..])
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/content")
            .route("/amenities", web::get().to(list_amenities))
            .route("/rates", web::get().to(list_rates))
            .route("/park", web::get().to(park_info))
            .route("/tabs", web::get().to(list_tabs)),
    );
}
