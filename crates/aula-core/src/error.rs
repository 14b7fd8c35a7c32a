// ── Core error types ──
//
// User-facing errors from aula-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly -- the
// `From<aula_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants. The one exception is `Api`, which
// carries the backend's own message for write rejections the client
// cannot predict (e.g. booking overlap).

use thiserror::Error;

use crate::booking::ValidationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    /// The stored or in-use credential is expired or was rejected
    /// mid-session. The session has already been cleared when this is
    /// returned; the only recovery is to sign in again.
    #[error("Session expired -- sign in again")]
    SessionExpired,

    /// Login was refused: wrong credentials, or an identity without the
    /// privilege the dashboard requires.
    #[error("{message}")]
    AuthRejected { message: String },

    /// The access token could not be decoded at all.
    #[error("Malformed access token: {reason}")]
    MalformedToken { reason: String },

    // ── Local validation ─────────────────────────────────────────────
    /// A booking failed the client-side checks. Never sent to the
    /// backend; resolved entirely in the form.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Backend rejections ───────────────────────────────────────────
    /// The backend refused a write for a reason only it can see
    /// (booking overlap, duplicate resource). Distinct from local
    /// validation by construction.
    #[error("Rejected by the backend: {message}")]
    Rejected { message: String },

    /// Any other non-2xx backend response.
    #[error("Backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Transport ────────────────────────────────────────────────────
    /// The backend could not be reached at all. Read paths keep their
    /// last-known-good state when this occurs.
    #[error("Backend unreachable: {reason}")]
    Unreachable { reason: String },

    // ── Credential storage ───────────────────────────────────────────
    /// The durable credential cache could not be read or written.
    #[error("Credential storage error: {message}")]
    Storage { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the caller must drop to the login screen.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aula_api::Error> for CoreError {
    fn from(err: aula_api::Error) -> Self {
        match err {
            aula_api::Error::Unauthorized => Self::SessionExpired,
            aula_api::Error::Authentication { message } => Self::AuthRejected { message },
            aula_api::Error::RequestFailed { status, message } => {
                // 409 is the backend's conflict verdict on a write the
                // client could not pre-validate.
                if status == 409 {
                    Self::Rejected { message }
                } else {
                    Self::Api { status, message }
                }
            }
            aula_api::Error::Unreachable(e) => Self::Unreachable {
                reason: e.to_string(),
            },
            aula_api::Error::InvalidUrl(e) => Self::Internal(e.to_string()),
            aula_api::Error::Deserialization { message, .. } => Self::Internal(message),
        }
    }
}
