//! Session, polling, and facility-state logic shared by the Aula
//! dashboards.
//!
//! The two dashboards (admin and staff) are thin views over this crate:
//!
//! - **[`SessionStore`]** — owns the credential and all durable identity
//!   storage. A credential is valid (decodable token, unexpired) or it
//!   is absent; restore, login, logout, and mid-session 401 are the
//!   only transitions.
//!
//! - **[`Facility`]** — composition root consumed by views: login with
//!   role gating, refresh cycles, polling handles, and validated
//!   mutations, all routed through one [`GatewayClient`].
//!
//! - **[`FacilityStore`]** — watch-channel snapshots of the latest
//!   fetched collections plus the wholesale-recomputed
//!   [`FacilitySummary`].
//!
//! - **[`spawn_poller`]** — the single generic polling loop every view
//!   reuses; returns a [`PollHandle`] disposer honoured on every exit
//!   path.
//!
//! - **[`booking::validate`]** — local temporal checks applied before a
//!   reservation may touch the network.

pub mod aggregate;
pub mod booking;
pub mod error;
pub mod facility;
pub mod poller;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{DeviceActivity, FacilitySummary, aggregate, time_since};
pub use booking::ValidationError;
pub use error::CoreError;
pub use facility::Facility;
pub use poller::{LIST_POLL_PERIOD, PollHandle, STATUS_POLL_PERIOD, spawn_poller};
pub use session::{
    Credential, CredentialStore, Identity, MemoryCredentialStore, Role, SessionState,
    SessionStore, StoredCredential,
};
pub use store::FacilityStore;

// Re-export the wire model for consumers that only depend on core.
pub use aula_api::types as model;
