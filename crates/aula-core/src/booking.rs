// ── Booking validation ──
//
// Temporal well-formedness checks for a proposed reservation, applied
// before anything touches the network. The backend remains the final
// authority: it can still reject for overlap reasons the client cannot
// see, and that rejection surfaces as `CoreError::Rejected`, never as
// one of these variants.

use chrono::NaiveDateTime;
use thiserror::Error;

use aula_api::types::Classroom;

/// Client-side booking rule violations. Each maps to a field-level
/// message in the form; none of them reach the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a classroom")]
    NoClassroomSelected,

    #[error("End time must be after start time")]
    InvalidOrder,

    #[error("Cannot book in the past")]
    InThePast,
}

/// Validate a proposed booking against the local rules.
///
/// Rejects iff no classroom is selected, `start >= end`, or
/// `start < now`. Ordering is checked before pastness so a form with
/// both problems reports the structural one first.
pub fn validate(
    classroom: Option<&Classroom>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    if classroom.is_none() {
        return Err(ValidationError::NoClassroomSelected);
    }
    if start >= end {
        return Err(ValidationError::InvalidOrder);
    }
    if start < now {
        return Err(ValidationError::InThePast);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn room() -> Classroom {
        Classroom {
            id: 1,
            name: "Room 1".into(),
            location: None,
            capacity: None,
            is_active: true,
            esp_device_id: None,
            status: None,
        }
    }

    #[test]
    fn accepts_well_formed_future_booking() {
        let now = Utc::now().naive_utc();
        let r = room();
        assert_eq!(
            validate(Some(&r), now + Duration::minutes(10), now + Duration::minutes(70), now),
            Ok(())
        );
    }

    #[test]
    fn rejects_missing_classroom_first() {
        let now = Utc::now().naive_utc();
        assert_eq!(
            validate(None, now + Duration::minutes(10), now + Duration::minutes(5), now),
            Err(ValidationError::NoClassroomSelected)
        );
    }

    #[test]
    fn rejects_inverted_range() {
        let now = Utc::now().naive_utc();
        let r = room();
        assert_eq!(
            validate(Some(&r), now + Duration::seconds(10), now + Duration::seconds(5), now),
            Err(ValidationError::InvalidOrder)
        );
    }

    #[test]
    fn rejects_zero_length_booking() {
        let now = Utc::now().naive_utc();
        let r = room();
        let t = now + Duration::minutes(10);
        assert_eq!(validate(Some(&r), t, t, now), Err(ValidationError::InvalidOrder));
    }

    #[test]
    fn rejects_start_in_the_past() {
        let now = Utc::now().naive_utc();
        let r = room();
        assert_eq!(
            validate(Some(&r), now - Duration::seconds(1), now + Duration::hours(1), now),
            Err(ValidationError::InThePast)
        );
    }

    #[test]
    fn start_exactly_now_is_allowed() {
        let now = Utc::now().naive_utc();
        let r = room();
        assert_eq!(validate(Some(&r), now, now + Duration::hours(1), now), Ok(()));
    }
}
