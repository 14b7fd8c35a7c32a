use thiserror::Error;

/// Top-level error type for the `aula-api` crate.
///
/// Every outcome of an HTTP round trip is classified into exactly one
/// variant. `aula-core` maps these into session-aware diagnostics; this
/// crate never clears or retries anything on its own.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, inactive account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The backend answered 401 mid-session. The caller decides whether
    /// to invalidate the session; this crate only reports it.
    #[error("Unauthorized -- credential rejected by the backend")]
    Unauthorized,

    // ── Request failures ────────────────────────────────────────────
    /// Any non-2xx response other than 401. Carries the backend's
    /// `{"error": ...}` message when one was present in the body.
    #[error("Request failed (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout -- the request never
    /// produced an HTTP status at all.
    #[error("Backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error must force the session back to the
    /// unauthenticated state.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if the request never reached the backend.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}
