// src/db/booking_repository.rs
// DOCUMENTATION: Booking inquiry database operations
// PURPOSE: Insert-only access to the bookings table

use crate::errors::SiteError;
use crate::models::{Booking, ValidBooking};
use sqlx::PgPool;

pub struct BookingRepository;

impl BookingRepository {
    /// Store one booking inquiry
    /// DOCUMENTATION: created_at is assigned by the database
    pub async fn create_booking(pool: &PgPool, req: &ValidBooking) -> Result<Booking, SiteError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (check_in, check_out, rv_type, guests, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, check_in, check_out, rv_type, guests, created_at
            "#,
        )
        .bind(req.check_in)
        .bind(req.check_out)
        .bind(req.rv_type.as_str())
        .bind(req.guests)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create booking: {}", e);
            SiteError::DatabaseError(format!("Create booking failed: {}", e))
        })?;

        Ok(booking)
    }
}
