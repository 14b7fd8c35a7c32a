// Staff API surface
//
// Classroom listing and room booking. The backend enforces its own
// overlap policy on booking creation (409 with an error message); the
// client validates temporal well-formedness locally before submitting
// but never second-guesses the conflict rule.

use crate::client::GatewayClient;
use crate::error::Error;
use crate::types::{Booking, Classroom, NewBooking};

impl GatewayClient {
    /// List active classrooms with their status, as visible to staff.
    pub async fn staff_classrooms(&self) -> Result<Vec<Classroom>, Error> {
        self.get("/api/staff/classrooms").await
    }

    /// List the current user's bookings.
    pub async fn staff_bookings(&self) -> Result<Vec<Booking>, Error> {
        self.get("/api/staff/bookings").await
    }

    /// Submit a booking. A backend conflict rejection arrives as
    /// `RequestFailed { status: 409, message }`.
    pub async fn create_booking(&self, new: &NewBooking) -> Result<Booking, Error> {
        self.post("/api/staff/bookings", new).await
    }
}
