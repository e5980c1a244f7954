// src/services/booking_service.rs
// DOCUMENTATION: Booking inquiry business logic
// PURPOSE: Validate the inquiry form and persist it

use sqlx::PgPool;
use validator::Validate;

use crate::db::BookingRepository;
use crate::errors::SiteError;
use crate::models::{
    BookingConfirmation, BookingModalState, CreateBookingRequest, ValidBooking,
    BOOKING_AUTO_CLOSE_MS, BOOKING_CONFIRMATION,
};

pub struct BookingService;

impl BookingService {
    /// Check every field is present and in range
    /// DOCUMENTATION: Nothing is written when this fails
    pub fn validate(req: CreateBookingRequest) -> Result<ValidBooking, SiteError> {
        req.validate()
            .map_err(|e| SiteError::ValidationError(e.to_string()))?;

        match (req.check_in, req.check_out, req.rv_type, req.guests) {
            (Some(check_in), Some(check_out), Some(rv_type), Some(guests)) => {
                if check_in > check_out {
                    log::debug!(
                        "Booking inquiry with check-in {} after check-out {}",
                        check_in,
                        check_out
                    );
                }
                Ok(ValidBooking {
                    check_in,
                    check_out,
                    rv_type,
                    guests,
                })
            }
            _ => Err(SiteError::ValidationError(
                "check_in, check_out, rv_type and guests are required".to_string(),
            )),
        }
    }

    pub async fn submit(
        pool: &PgPool,
        req: CreateBookingRequest,
    ) -> Result<BookingConfirmation, SiteError> {
        let booking = Self::validate(req)?;
        let stored = BookingRepository::create_booking(pool, &booking).await?;

        log::info!(
            "Booking inquiry {} recorded ({} guests, {})",
            stored.id,
            stored.guests,
            stored.rv_type
        );

        Ok(BookingConfirmation {
            booking: stored,
            message: BOOKING_CONFIRMATION,
            auto_close_ms: BOOKING_AUTO_CLOSE_MS,
            modal: BookingModalState::Submitting.resolve(Ok(())),
        })
    }
}
