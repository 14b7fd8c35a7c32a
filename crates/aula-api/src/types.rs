// Wire types for the facility backend's JSON surface.
//
// Field names match the backend's snake_case payloads one-to-one.
// Timestamps arrive as naive ISO-8601 strings (the backend serializes
// UTC without an offset), so they are modeled as `NaiveDateTime` and
// interpreted as UTC by consumers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Authentication ───────────────────────────────────────────────────

/// Identity record returned alongside the access token at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Response body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserAccount,
}

/// Request body for creating a user account.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    /// Backend defaults omitted roles to `staff`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// ── Classrooms ───────────────────────────────────────────────────────

/// Room telemetry snapshot, backend-authoritative.
///
/// The client never mutates this; a power command only takes effect on
/// a later fetch once the backend has observed the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomStatus {
    #[serde(default)]
    pub is_occupied: bool,
    #[serde(default)]
    pub is_power_on: bool,
    /// Seconds since last movement was detected.
    #[serde(default)]
    pub last_movement: i64,
    pub temperature: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub esp_device_id: Option<String>,
    /// Absent when the room has never reported telemetry.
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClassroom {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esp_device_id: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// An ESP sensor/actuator device as reported by the backend.
///
/// `is_connected` is computed server-side (seen within the backend's
/// liveness window); the client renders it but never derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub name: String,
    pub mac_address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_connected: bool,
    pub last_seen: Option<NaiveDateTime>,
    pub firmware_version: Option<String>,
    /// Populated only by `GET /api/admin/devices/status`.
    #[serde(default)]
    pub classroom_name: Option<String>,
    #[serde(default)]
    pub classroom_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDevice {
    pub device_id: String,
    pub name: String,
    /// Shared secret the ESP firmware presents on its reporting endpoints.
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
}

// ── Power control ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PowerRequest {
    pub power_on: bool,
}

/// Acknowledgement of an actuation request. The status fields observable
/// via classroom polling change eventually, not in this response.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerAck {
    pub message: String,
    pub device_id: String,
    pub power_on: bool,
}

// ── Bookings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub classroom_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub classroom_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Contact ──────────────────────────────────────────────────────────

/// Unauthenticated contact-form submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: String,
}

fn default_true() -> bool {
    true
}
