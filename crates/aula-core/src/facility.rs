// ── Facility service ──
//
// The composition root the dashboards consume: wires the session store,
// gateway client, snapshot store, and poller together. View code calls
// these methods and renders from the store; it never touches HTTP or
// durable storage itself.
//
// Session policy: any mid-session 401 invalidates the credential here
// (clearing both the persisted copy and the gateway's bearer slot) and
// surfaces as `CoreError::SessionExpired`, so every caller sees one
// uniform re-authentication signal.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use secrecy::SecretString;
use tracing::{debug, info};

use aula_api::GatewayClient;
use aula_api::types::{
    Booking, Classroom, ContactMessage, Device, LoginResponse, NewBooking, NewClassroom,
    NewDevice, NewUser, PowerAck, UserAccount,
};

use crate::booking::{self, ValidationError};
use crate::error::CoreError;
use crate::poller::{LIST_POLL_PERIOD, PollHandle, STATUS_POLL_PERIOD, spawn_poller};
use crate::session::{Credential, Identity, Role, SessionStore};
use crate::store::FacilityStore;

/// The main entry point for dashboard consumers. Cheaply cloneable;
/// all clones share the same session, gateway, and snapshot store.
#[derive(Clone)]
pub struct Facility {
    inner: Arc<FacilityInner>,
}

struct FacilityInner {
    gateway: GatewayClient,
    session: SessionStore,
    store: FacilityStore,
}

impl Facility {
    pub fn new(gateway: GatewayClient, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(FacilityInner {
                gateway,
                session,
                store: FacilityStore::new(),
            }),
        }
    }

    /// The snapshot store views render from.
    pub fn store(&self) -> &FacilityStore {
        &self.inner.store
    }

    /// The session store (read-only access for consumers; all writes
    /// go through the login/logout methods here).
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Restore a persisted session on process start. Installs the
    /// bearer token on the gateway when a valid credential exists.
    pub fn restore(&self) -> Option<Arc<Credential>> {
        let cred = self.inner.session.restore()?;
        self.inner.gateway.set_bearer(cred.token.clone());
        Some(cred)
    }

    /// Sign in against the admin dashboard. A protocol-level success
    /// with a non-admin identity is rejected with "Admin access
    /// required" and establishes no session.
    pub async fn login_admin(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<Credential>, CoreError> {
        let resp = self.inner.gateway.login(username, password).await?;
        let role = Role::from_wire(&resp.user.role);
        if !role.is_admin() {
            debug!(username, %role, "admin login rejected for insufficient role");
            return Err(CoreError::AuthRejected {
                message: "Admin access required".into(),
            });
        }
        self.establish(resp, role)
    }

    /// Sign in against the staff portal. Any authenticated identity is
    /// accepted; admins can use the staff views too.
    pub async fn login_staff(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<Credential>, CoreError> {
        let resp = self.inner.gateway.login(username, password).await?;
        let role = Role::from_wire(&resp.user.role);
        self.establish(resp, role)
    }

    /// End the session: clear persisted identity and the bearer slot.
    pub fn logout(&self) {
        info!("logging out");
        self.invalidate();
    }

    fn establish(&self, resp: LoginResponse, role: Role) -> Result<Arc<Credential>, CoreError> {
        let identity = Identity {
            username: resp.user.username,
            role,
        };
        let cred = Credential::from_token(resp.access_token, identity)?;
        let cred = self.inner.session.set(cred)?;
        self.inner.gateway.set_bearer(cred.token.clone());
        info!(username = %cred.identity.username, %role, "session established");
        Ok(cred)
    }

    fn invalidate(&self) {
        self.inner.session.clear();
        self.inner.gateway.clear_bearer();
    }

    // ── Refresh operations (poller targets) ──────────────────────────

    /// Fetch the admin dashboard's volatile resources and apply them
    /// as one cycle: classrooms plus enriched device status.
    pub async fn refresh_admin(&self) -> Result<(), CoreError> {
        let classrooms = self
            .inner
            .gateway
            .admin_classrooms()
            .await
            .map_err(|e| self.read_failure(e))?;
        let devices = self
            .inner
            .gateway
            .admin_device_status()
            .await
            .map_err(|e| self.read_failure(e))?;
        self.inner.store.apply_facility(classrooms, devices);
        Ok(())
    }

    /// Fetch the staff portal's volatile resources: classrooms with
    /// status, and the user's bookings.
    pub async fn refresh_staff(&self) -> Result<(), CoreError> {
        let classrooms = self
            .inner
            .gateway
            .staff_classrooms()
            .await
            .map_err(|e| self.read_failure(e))?;
        let bookings = self
            .inner
            .gateway
            .staff_bookings()
            .await
            .map_err(|e| self.read_failure(e))?;
        self.inner.store.apply_classrooms(classrooms);
        self.inner.store.apply_bookings(bookings);
        Ok(())
    }

    /// Refresh the user list (admin view; not part of the facility
    /// summary, so it is returned rather than stored).
    pub async fn list_users(&self) -> Result<Vec<UserAccount>, CoreError> {
        self.inner
            .gateway
            .admin_users()
            .await
            .map_err(|e| self.write_failure(e))
    }

    /// Plain device registry listing, without the status enrichment the
    /// dashboard poll uses.
    pub async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        self.inner
            .gateway
            .admin_devices()
            .await
            .map_err(|e| self.write_failure(e))
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Start the 15 s status poll for the admin dashboard.
    /// `on_unauthorized` fires at most once, after the session has
    /// already been invalidated.
    pub fn start_admin_polling(
        &self,
        on_unauthorized: impl FnOnce() + Send + 'static,
    ) -> PollHandle {
        let this = self.clone();
        spawn_poller(
            STATUS_POLL_PERIOD,
            move || {
                let this = this.clone();
                async move { this.refresh_admin().await }
            },
            on_unauthorized,
        )
    }

    /// Start the 30 s list poll for the staff portal.
    pub fn start_staff_polling(
        &self,
        on_unauthorized: impl FnOnce() + Send + 'static,
    ) -> PollHandle {
        let this = self.clone();
        spawn_poller(
            LIST_POLL_PERIOD,
            move || {
                let this = this.clone();
                async move { this.refresh_staff().await }
            },
            on_unauthorized,
        )
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Validate locally, then submit a booking. Local rule violations
    /// never reach the network; a backend overlap verdict comes back
    /// as `CoreError::Rejected`.
    pub async fn create_booking(
        &self,
        classroom: Option<&Classroom>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: String,
        description: Option<String>,
    ) -> Result<Booking, CoreError> {
        booking::validate(classroom, start, end, Utc::now().naive_utc())?;
        let Some(classroom) = classroom else {
            return Err(ValidationError::NoClassroomSelected.into());
        };

        let new = NewBooking {
            classroom_id: classroom.id,
            start_time: start,
            end_time: end,
            title,
            description,
        };
        self.inner
            .gateway
            .create_booking(&new)
            .await
            .map_err(|e| self.write_failure(e))
    }

    /// Request a power change. The observable status flips on a later
    /// poll, not in this call's response.
    pub async fn set_power(&self, classroom_id: i64, power_on: bool) -> Result<PowerAck, CoreError> {
        self.inner
            .gateway
            .set_power(classroom_id, power_on)
            .await
            .map_err(|e| self.write_failure(e))
    }

    pub async fn create_classroom(&self, new: &NewClassroom) -> Result<Classroom, CoreError> {
        self.inner
            .gateway
            .create_classroom(new)
            .await
            .map_err(|e| self.write_failure(e))
    }

    pub async fn create_device(&self, new: &NewDevice) -> Result<Device, CoreError> {
        self.inner
            .gateway
            .create_device(new)
            .await
            .map_err(|e| self.write_failure(e))
    }

    pub async fn create_user(&self, new: &NewUser) -> Result<UserAccount, CoreError> {
        self.inner
            .gateway
            .create_user(new)
            .await
            .map_err(|e| self.write_failure(e))
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), CoreError> {
        self.inner
            .gateway
            .delete_user(user_id)
            .await
            .map_err(|e| self.write_failure(e))
    }

    /// Contact form -- deliberately session-agnostic.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), CoreError> {
        self.inner
            .gateway
            .send_contact(message)
            .await
            .map_err(CoreError::from)
    }

    // ── Failure routing ──────────────────────────────────────────────

    /// Read-path failure: a 401 invalidates the session; anything else
    /// is recorded on the store so views show a banner over their
    /// last-known-good data.
    fn read_failure(&self, e: aula_api::Error) -> CoreError {
        if e.is_unauthorized() {
            self.invalidate();
            return CoreError::SessionExpired;
        }
        let err = CoreError::from(e);
        self.inner.store.record_error(err.to_string());
        err
    }

    /// Write-path failure: a 401 invalidates the session; anything
    /// else aborts the action and is returned to the form, which keeps
    /// its fields for resubmission.
    fn write_failure(&self, e: aula_api::Error) -> CoreError {
        if e.is_unauthorized() {
            self.invalidate();
            return CoreError::SessionExpired;
        }
        e.into()
    }
}
