// src/models/booking.rs
// DOCUMENTATION: Booking inquiry records and the booking modal flow
// PURPOSE: Write-once reservation requests; no availability logic

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// How long the success state stays up before the modal closes itself
pub const BOOKING_AUTO_CLOSE_MS: u64 = 2500;

pub const BOOKING_CONFIRMATION: &str = "Booking request sent! We will contact you shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RvType {
    #[serde(rename = "Travel Trailer")]
    TravelTrailer,
    #[serde(rename = "Fifth Wheel")]
    FifthWheel,
    #[serde(rename = "Class A Motorhome")]
    ClassA,
    #[serde(rename = "Class B/C Motorhome")]
    ClassBC,
    #[serde(rename = "Van / Truck Camper")]
    VanTruckCamper,
}

impl RvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RvType::TravelTrailer => "Travel Trailer",
            RvType::FifthWheel => "Fifth Wheel",
            RvType::ClassA => "Class A Motorhome",
            RvType::ClassBC => "Class B/C Motorhome",
            RvType::VanTruckCamper => "Van / Truck Camper",
        }
    }
}

/// Stored booking inquiry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rv_type: String,
    pub guests: i32,
    pub created_at: DateTime<Utc>,
}

/// POST /bookings body
/// DOCUMENTATION: Every field is required. The date range itself is not
/// checked; check-in after check-out is stored as submitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(required)]
    pub check_in: Option<NaiveDate>,

    #[validate(required)]
    pub check_out: Option<NaiveDate>,

    #[validate(required)]
    pub rv_type: Option<RvType>,

    #[validate(required, range(min = 1, max = 10))]
    pub guests: Option<i32>,
}

/// Booking request after validation, with every field present
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rv_type: RvType,
    pub guests: i32,
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub message: &'static str,
    pub auto_close_ms: u64,
    /// State the booking modal moves to on this answer
    pub modal: BookingModalState,
}

/// Booking modal view state
/// DOCUMENTATION: Closed -> Open -> Submitting -> Success | OpenWithError.
/// Success closes itself once BOOKING_AUTO_CLOSE_MS has elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingModalState {
    Closed,
    Open,
    Submitting,
    Success { elapsed_ms: u64 },
    OpenWithError(String),
}

impl BookingModalState {
    #[allow(dead_code)]
    pub fn open(self) -> Self {
        match self {
            BookingModalState::Closed => BookingModalState::Open,
            other => other,
        }
    }

    /// Only an open form can be submitted; a second click while submitting is ignored
    #[allow(dead_code)]
    pub fn submit(self) -> Self {
        match self {
            BookingModalState::Open | BookingModalState::OpenWithError(_) => {
                BookingModalState::Submitting
            }
            other => other,
        }
    }

    pub fn resolve(self, outcome: Result<(), String>) -> Self {
        match (self, outcome) {
            (BookingModalState::Submitting, Ok(())) => {
                BookingModalState::Success { elapsed_ms: 0 }
            }
            (BookingModalState::Submitting, Err(message)) => {
                BookingModalState::OpenWithError(message)
            }
            (other, _) => other,
        }
    }

    /// Advance the success timer
    #[allow(dead_code)]
    pub fn tick(self, delta_ms: u64) -> Self {
        match self {
            BookingModalState::Success { elapsed_ms } => {
                let elapsed_ms = elapsed_ms.saturating_add(delta_ms);
                if elapsed_ms >= BOOKING_AUTO_CLOSE_MS {
                    BookingModalState::Closed
                } else {
                    BookingModalState::Success { elapsed_ms }
                }
            }
            other => other,
        }
    }

    /// Dismissal is refused mid-submit
    #[allow(dead_code)]
    pub fn close(self) -> Self {
        match self {
            BookingModalState::Submitting => BookingModalState::Submitting,
            _ => BookingModalState::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_happy_path_auto_closes() {
        let state = BookingModalState::Closed.open().submit().resolve(Ok(()));
        assert_eq!(state, BookingModalState::Success { elapsed_ms: 0 });

        let state = state.tick(1000);
        assert_eq!(state, BookingModalState::Success { elapsed_ms: 1000 });

        let state = state.tick(BOOKING_AUTO_CLOSE_MS);
        assert_eq!(state, BookingModalState::Closed);
    }

    #[test]
    fn test_modal_failure_returns_to_open_with_error() {
        let state = BookingModalState::Closed
            .open()
            .submit()
            .resolve(Err("network".into()));
        assert_eq!(state, BookingModalState::OpenWithError("network".into()));

        // user can retry from the error state
        assert_eq!(state.submit(), BookingModalState::Submitting);
    }

    #[test]
    fn test_modal_ignores_out_of_order_events() {
        assert_eq!(BookingModalState::Closed.submit(), BookingModalState::Closed);
        assert_eq!(
            BookingModalState::Submitting.close(),
            BookingModalState::Submitting
        );
        assert_eq!(BookingModalState::Open.tick(10_000), BookingModalState::Open);
    }

    #[test]
    fn test_modal_state_wire_shape() {
        let value = serde_json::to_value(BookingModalState::Submitting.resolve(Ok(()))).unwrap();
        assert_eq!(value, serde_json::json!({ "success": { "elapsed_ms": 0 } }));
    }

    #[test]
    fn test_rv_type_wire_names() {
        let parsed: RvType = serde_json::from_str("\"Class B/C Motorhome\"").unwrap();
        assert_eq!(parsed, RvType::ClassBC);
        assert_eq!(RvType::VanTruckCamper.as_str(), "Van / Truck Camper");
    }
}
