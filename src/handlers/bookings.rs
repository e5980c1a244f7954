// src/handlers/bookings.rs
// DOCUMENTATION: HTTP handler for booking inquiries
// PURPOSE: Accept the booking form and record it

use crate::errors::SiteError;
use crate::models::CreateBookingRequest;
use crate::services::BookingService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /bookings
/// Record a booking inquiry; the response carries the confirmation text
pub async fn create_booking(
    pool: web::Data<PgPool>,
    body: web::Json<CreateBookingRequest>,
) -> Result<impl Responder, SiteError> {
    let confirmation = BookingService::submit(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(confirmation))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/bookings", web::post().to(create_booking));
}
