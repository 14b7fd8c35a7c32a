// Admin API surface
//
// Bearer-authenticated CRUD for classrooms, devices, and users, plus
// the power actuation endpoint. Non-admin identities receive 403 from
// the backend, which surfaces as `RequestFailed { status: 403, .. }` --
// distinct from the 401 that invalidates a session.

use crate::client::GatewayClient;
use crate::error::Error;
use crate::types::{
    Classroom, Device, NewClassroom, NewDevice, NewUser, PowerAck, PowerRequest, UserAccount,
};

impl GatewayClient {
    // ── Classrooms ───────────────────────────────────────────────────

    /// List all classrooms with their latest telemetry snapshots.
    pub async fn admin_classrooms(&self) -> Result<Vec<Classroom>, Error> {
        self.get("/api/admin/classrooms").await
    }

    /// Create a classroom. Returns the created resource.
    pub async fn create_classroom(&self, new: &NewClassroom) -> Result<Classroom, Error> {
        self.post("/api/admin/classrooms", new).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// List registered ESP devices.
    pub async fn admin_devices(&self) -> Result<Vec<Device>, Error> {
        self.get("/api/admin/devices").await
    }

    /// List devices enriched with connectivity and linked-classroom info.
    pub async fn admin_device_status(&self) -> Result<Vec<Device>, Error> {
        self.get("/api/admin/devices/status").await
    }

    /// Register a new ESP device. Returns the created resource.
    pub async fn create_device(&self, new: &NewDevice) -> Result<Device, Error> {
        self.post("/api/admin/devices", new).await
    }

    // ── Users ────────────────────────────────────────────────────────

    /// List all user accounts.
    pub async fn admin_users(&self) -> Result<Vec<UserAccount>, Error> {
        self.get("/api/admin/users").await
    }

    /// Create a user account. Role defaults to `staff` server-side.
    pub async fn create_user(&self, new: &NewUser) -> Result<UserAccount, Error> {
        self.post("/api/admin/users", new).await
    }

    /// Delete a user account by id.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), Error> {
        self.delete(&format!("/api/admin/users/{user_id}")).await
    }

    // ── Power control ────────────────────────────────────────────────

    /// Request a power state change for a classroom's linked device.
    ///
    /// Success means the command was queued, not that the room's status
    /// already changed -- `is_power_on` updates on a later poll.
    pub async fn set_power(&self, classroom_id: i64, power_on: bool) -> Result<PowerAck, Error> {
        self.post(
            &format!("/api/admin/power/{classroom_id}"),
            &PowerRequest { power_on },
        )
        .await
    }
}
