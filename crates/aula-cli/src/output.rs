//! Table rendering for dashboard output.

use chrono::Utc;
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use aula_core::model::{Booking, Classroom, Device, UserAccount};
use aula_core::{DeviceActivity, FacilitySummary, time_since};

// ── Summary ─────────────────────────────────────────────────────────

/// Render the facility overview block the admin dashboard leads with.
pub fn render_summary(summary: &FacilitySummary) -> String {
    let activity = match summary.device_activity() {
        DeviceActivity::AllOnline => "all online".green().to_string(),
        DeviceActivity::AllOffline => "all offline".red().to_string(),
        DeviceActivity::Partial => "partial".yellow().to_string(),
    };

    format!(
        "Classrooms: {}   Occupied: {}   Power on: {}   Devices online: {}/{} ({})",
        summary.total_classrooms,
        summary.occupied,
        summary.powered_on,
        summary.connected_devices,
        summary.total_devices,
        activity,
    )
}

// ── Classrooms ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClassroomRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Last movement")]
    last_movement: String,
    #[tabled(rename = "Temp")]
    temperature: String,
}

pub fn classroom_table(classrooms: &[Classroom]) -> String {
    let rows: Vec<ClassroomRow> = classrooms
        .iter()
        .map(|c| {
            let (status, power, movement, temp) = match &c.status {
                Some(s) => (
                    if s.is_occupied {
                        "occupied".red().to_string()
                    } else {
                        "idle".green().to_string()
                    },
                    if s.is_power_on {
                        "ON".yellow().to_string()
                    } else {
                        "off".dimmed().to_string()
                    },
                    format!("{}s ago", s.last_movement),
                    s.temperature
                        .map_or_else(|| "—".into(), |t| format!("{t:.1}°C")),
                ),
                None => ("—".into(), "—".into(), "—".into(), "—".into()),
            };
            ClassroomRow {
                id: c.id,
                name: c.name.clone(),
                location: c.location.clone().unwrap_or_else(|| "—".into()),
                capacity: c.capacity.map_or_else(|| "—".into(), |n| n.to_string()),
                status,
                power,
                last_movement: movement,
                temperature: temp,
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    device_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Classroom")]
    classroom: String,
}

pub fn device_table(devices: &[Device]) -> String {
    let now = Utc::now().naive_utc();
    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|d| DeviceRow {
            device_id: d.device_id.clone(),
            name: d.name.clone(),
            mac: d.mac_address.clone().unwrap_or_else(|| "—".into()),
            connected: if d.is_connected {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            },
            last_seen: time_since(d.last_seen, now),
            firmware: d.firmware_version.clone().unwrap_or_else(|| "—".into()),
            classroom: d.classroom_name.clone().unwrap_or_else(|| "—".into()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: String,
}

pub fn user_table(users: &[UserAccount]) -> String {
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone().unwrap_or_else(|| "—".into()),
            role: u.role.clone(),
            active: if u.is_active { "yes".into() } else { "no".into() },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Bookings ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Classroom")]
    classroom_id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Confirmed")]
    confirmed: String,
}

pub fn booking_table(bookings: &[Booking]) -> String {
    let rows: Vec<BookingRow> = bookings
        .iter()
        .map(|b| BookingRow {
            id: b.id,
            classroom_id: b.classroom_id,
            title: b.title.clone().unwrap_or_else(|| "—".into()),
            start: b.start_time.format("%Y-%m-%d %H:%M").to_string(),
            end: b.end_time.format("%Y-%m-%d %H:%M").to_string(),
            confirmed: if b.is_confirmed { "yes".into() } else { "no".into() },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
