//! Staff portal commands: availability dashboard, bookings, contact.

use chrono::NaiveDateTime;

use aula_core::Facility;
use aula_core::model::ContactMessage;

use crate::cli::{GlobalOpts, StaffCommand};
use crate::commands::admin::{WatchView, watch_loop};
use crate::commands::require_session;
use crate::error::CliError;
use crate::output;

pub async fn run(global: &GlobalOpts, command: StaffCommand) -> Result<(), CliError> {
    let facility = crate::build_facility(global)?;

    // The contact form is open to anonymous visitors.
    if let StaffCommand::Contact {
        name,
        email,
        subject,
        message,
        message_type,
    } = command
    {
        facility
            .send_contact(&ContactMessage {
                name,
                email,
                subject,
                message,
                message_type,
            })
            .await?;
        if !global.quiet {
            println!("Message sent. Facility support will follow up by email.");
        }
        return Ok(());
    }

    require_session(&facility)?;
    match command {
        StaffCommand::Dashboard { watch } => dashboard(&facility, watch).await,
        StaffCommand::Bookings => bookings(&facility).await,
        StaffCommand::Book {
            classroom,
            start,
            end,
            title,
            description,
        } => book(&facility, classroom, &start, &end, title, description).await,
        StaffCommand::Contact { .. } => unreachable!("handled above"),
    }
}

async fn dashboard(facility: &Facility, watch: bool) -> Result<(), CliError> {
    if !watch {
        facility.refresh_staff().await?;
        println!("{}", output::classroom_table(&facility.store().classrooms()));
        return Ok(());
    }
    watch_loop(facility.clone(), WatchView::Staff).await
}

async fn bookings(facility: &Facility) -> Result<(), CliError> {
    facility.refresh_staff().await?;
    let bookings = facility.store().bookings();
    if bookings.is_empty() {
        println!("No bookings.");
    } else {
        println!("{}", output::booking_table(&bookings));
    }
    Ok(())
}

async fn book(
    facility: &Facility,
    classroom_id: i64,
    start: &str,
    end: &str,
    title: String,
    description: Option<String>,
) -> Result<(), CliError> {
    let start = parse_datetime("start", start)?;
    let end = parse_datetime("end", end)?;

    facility.refresh_staff().await?;
    let classrooms = facility.store().classrooms();
    let classroom = classrooms.iter().find(|c| c.id == classroom_id);
    if classroom.is_none() {
        return Err(CliError::BadArgument {
            field: "classroom".into(),
            reason: format!("no classroom with id {classroom_id}"),
        });
    }

    let booking = facility
        .create_booking(classroom, start, end, title, description)
        .await?;
    println!(
        "Booked classroom {} from {} to {} (booking id {})",
        booking.classroom_id,
        booking.start_time.format("%Y-%m-%d %H:%M"),
        booking.end_time.format("%Y-%m-%d %H:%M"),
        booking.id
    );
    Ok(())
}

/// Accept `2026-03-02T09:00` or `2026-03-02 09:00`, with optional
/// seconds.
fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime, CliError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| CliError::BadArgument {
            field: field.into(),
            reason: format!("cannot parse '{value}' as a date-time (expected e.g. 2026-03-02T09:00)"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        let a = parse_datetime("start", "2026-03-02T09:00").unwrap();
        let b = parse_datetime("start", "2026-03-02 09:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_seconds() {
        parse_datetime("end", "2026-03-02T09:00:30").unwrap();
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_datetime("start", "tomorrow").unwrap_err();
        assert!(matches!(err, CliError::BadArgument { .. }));
    }
}
