// ── Session store ──
//
// Owns the current credential and is the only writer of persisted
// identity. A credential is either valid (decodable token, expiry in
// the future) or treated as absent -- there is no partially-valid
// state. Expiry comes from the token's own `exp` claim, never from
// anything the storage layer says.

use std::sync::{Arc, Mutex, RwLock};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

// ── Identity ─────────────────────────────────────────────────────────

/// Authorization role embedded in the identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Parse the backend's role string. Unknown values map to the
    /// least-privileged role rather than failing the whole login.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Staff,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Who the credential belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

// ── Credential ───────────────────────────────────────────────────────

/// A bearer token plus the identity it authorizes.
///
/// `expires_at` is derived by decoding the token's embedded `exp`
/// claim -- it is never accepted from storage or from the backend's
/// login response body.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: SecretString,
    pub identity: Identity,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Build a credential from a raw token and identity, decoding the
    /// expiry claim. Fails if the token is not a decodable JWT or its
    /// `exp` claim is missing or out of range.
    pub fn from_token(token: String, identity: Identity) -> Result<Self, CoreError> {
        let claims = decode_claims(&token)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            CoreError::MalformedToken {
                reason: format!("exp claim out of range: {}", claims.exp),
            }
        })?;
        let issued_at = claims.iat.and_then(|iat| DateTime::from_timestamp(iat, 0));

        Ok(Self {
            token: token.into(),
            identity,
            issued_at,
            expires_at,
        })
    }

    /// Whether the credential is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// ── JWT claim peeking ────────────────────────────────────────────────

/// The subset of JWT claims the client cares about. Signature
/// verification is the backend's job; the client only peeks at expiry
/// to avoid presenting a token it already knows is dead.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

fn decode_claims(token: &str) -> Result<TokenClaims, CoreError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_sig)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CoreError::MalformedToken {
            reason: "expected three dot-separated segments".into(),
        });
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| CoreError::MalformedToken {
            reason: format!("payload is not base64url: {e}"),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| CoreError::MalformedToken {
        reason: format!("payload is not valid claims JSON: {e}"),
    })
}

// ── Durable storage seam ─────────────────────────────────────────────

/// The persisted form of a credential: the raw token plus the identity
/// record. Expiry is deliberately NOT stored -- it is re-derived from
/// the token on every restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub identity: Identity,
}

/// Durable credential storage. `aula-config` provides the file-backed
/// implementation; [`MemoryCredentialStore`] backs tests and ephemeral
/// sessions.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredential>, CoreError>;
    fn store(&self, cred: &StoredCredential) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-memory credential store (tests, `--no-save` sessions).
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<StoredCredential>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, CoreError> {
        Ok(self.lock().clone())
    }

    fn store(&self, cred: &StoredCredential) -> Result<(), CoreError> {
        *self.lock() = Some(cred.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.lock() = None;
        Ok(())
    }
}

impl MemoryCredentialStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoredCredential>> {
        // Mutex poisoning only occurs if a holder panicked; recover the
        // value rather than cascading the panic.
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ── Session store ────────────────────────────────────────────────────

/// Observable session state. There are exactly two states; every
/// expiry, logout, or mid-session 401 lands back in `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Holds the current credential and mediates all access to durable
/// identity storage. No other component reads or writes storage.
pub struct SessionStore {
    storage: Box<dyn CredentialStore>,
    current: RwLock<Option<Arc<Credential>>>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn CredentialStore>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Restore a persisted credential if one exists and is still valid.
    ///
    /// A malformed token is treated exactly like an expired one: the
    /// persisted state is cleared and `None` is returned. Either way
    /// the caller ends up in a clean state.
    pub fn restore(&self) -> Option<Arc<Credential>> {
        let stored = match self.storage.load() {
            Ok(Some(s)) => s,
            Ok(None) => return None,
            Err(e) => {
                // Scrub the unreadable entry so the next start is clean
                // instead of warning again.
                warn!(error = %e, "credential cache unreadable -- clearing it");
                if let Err(e) = self.storage.clear() {
                    warn!(error = %e, "failed to clear unreadable credential cache");
                }
                return None;
            }
        };

        match Credential::from_token(stored.token, stored.identity) {
            Ok(cred) if cred.is_valid_at(Utc::now()) => {
                debug!(username = %cred.identity.username, "session restored");
                let cred = Arc::new(cred);
                *self.write() = Some(Arc::clone(&cred));
                Some(cred)
            }
            Ok(_) | Err(_) => {
                debug!("persisted credential expired or undecodable -- clearing");
                if let Err(e) = self.storage.clear() {
                    warn!(error = %e, "failed to clear stale credential");
                }
                None
            }
        }
    }

    /// Install a fresh credential after a successful, role-checked
    /// login. Overwrites any previous credential.
    pub fn set(&self, cred: Credential) -> Result<Arc<Credential>, CoreError> {
        self.storage.store(&StoredCredential {
            token: cred.token.expose_secret().to_owned(),
            identity: cred.identity.clone(),
        })?;
        let cred = Arc::new(cred);
        *self.write() = Some(Arc::clone(&cred));
        Ok(cred)
    }

    /// Drop the credential and return to the unauthenticated state.
    /// Used for logout, detected expiry, and mid-session 401.
    pub fn clear(&self) {
        *self.write() = None;
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to clear persisted credential");
        }
    }

    /// The current credential, if any.
    pub fn current(&self) -> Option<Arc<Credential>> {
        self.read().clone()
    }

    pub fn state(&self) -> SessionState {
        if self.read().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Arc<Credential>>> {
        self.current.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<Credential>>> {
        self.current.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Build an unsigned-but-well-formed JWT with the given claims.
    fn make_token(exp: i64, iat: Option<i64>) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let mut claims = serde_json::json!({ "exp": exp, "sub": "1" });
        if let Some(iat) = iat {
            claims["iat"] = iat.into();
        }
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{header}.{payload}.sig")
    }

    fn staff_identity() -> Identity {
        Identity {
            username: "pat".into(),
            role: Role::Staff,
        }
    }

    fn store_with(stored: Option<StoredCredential>) -> SessionStore {
        let mem = MemoryCredentialStore::default();
        if let Some(s) = stored {
            mem.store(&s).unwrap();
        }
        SessionStore::new(Box::new(mem))
    }

    #[test]
    fn restore_returns_credential_only_when_unexpired() {
        let future_exp = Utc::now().timestamp() + 3600;
        let store = store_with(Some(StoredCredential {
            token: make_token(future_exp, None),
            identity: staff_identity(),
        }));

        let cred = store.restore().expect("should restore");
        assert_eq!(cred.identity.username, "pat");
        assert_eq!(cred.expires_at.timestamp(), future_exp);
        assert_eq!(store.state(), SessionState::Authenticated);
    }

    #[test]
    fn restore_clears_expired_credential() {
        let store = store_with(Some(StoredCredential {
            token: make_token(Utc::now().timestamp() - 10, None),
            identity: staff_identity(),
        }));

        assert!(store.restore().is_none());
        assert_eq!(store.state(), SessionState::Unauthenticated);
        // The stale entry must be gone from storage too.
        assert!(store.storage.load().unwrap().is_none());
    }

    #[test]
    fn malformed_token_treated_like_expiry() {
        let store = store_with(Some(StoredCredential {
            token: "not-a-jwt".into(),
            identity: staff_identity(),
        }));

        assert!(store.restore().is_none());
        assert!(store.storage.load().unwrap().is_none());
    }

    #[test]
    fn unreadable_storage_is_cleared_on_restore() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct UnreadableStore {
            cleared: Arc<AtomicBool>,
        }

        impl CredentialStore for UnreadableStore {
            fn load(&self) -> Result<Option<StoredCredential>, CoreError> {
                Err(CoreError::Storage {
                    message: "corrupt".into(),
                })
            }
            fn store(&self, _cred: &StoredCredential) -> Result<(), CoreError> {
                Ok(())
            }
            fn clear(&self) -> Result<(), CoreError> {
                self.cleared.store(true, Ordering::SeqCst);
                Ok(())
            }
        }

        let cleared = Arc::new(AtomicBool::new(false));
        let store = SessionStore::new(Box::new(UnreadableStore {
            cleared: Arc::clone(&cleared),
        }));

        assert!(store.restore().is_none());
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(
            cleared.load(Ordering::SeqCst),
            "unreadable entry must be scrubbed, not left to warn on every start"
        );
    }

    #[test]
    fn garbage_payload_segment_is_rejected() {
        let store = store_with(Some(StoredCredential {
            token: "aGVhZGVy.!!!not-base64!!!.sig".into(),
            identity: staff_identity(),
        }));
        assert!(store.restore().is_none());
    }

    #[test]
    fn set_persists_and_overwrites() {
        let store = store_with(None);
        let exp = Utc::now().timestamp() + 600;

        store
            .set(Credential::from_token(make_token(exp, Some(exp - 600)), staff_identity()).unwrap())
            .unwrap();
        assert_eq!(store.state(), SessionState::Authenticated);

        let second = Identity {
            username: "casey".into(),
            role: Role::Admin,
        };
        store
            .set(Credential::from_token(make_token(exp, None), second).unwrap())
            .unwrap();

        let current = store.current().unwrap();
        assert_eq!(current.identity.username, "casey");
        let persisted = store.storage.load().unwrap().unwrap();
        assert_eq!(persisted.identity.username, "casey");
    }

    #[test]
    fn clear_returns_to_unauthenticated() {
        let store = store_with(None);
        let exp = Utc::now().timestamp() + 600;
        store
            .set(Credential::from_token(make_token(exp, None), staff_identity()).unwrap())
            .unwrap();

        store.clear();
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(store.current().is_none());
        assert!(store.storage.load().unwrap().is_none());
    }

    #[test]
    fn credential_carries_iat_when_present() {
        let now = Utc::now().timestamp();
        let cred =
            Credential::from_token(make_token(now + 60, Some(now)), staff_identity()).unwrap();
        assert_eq!(cred.issued_at.unwrap().timestamp(), now);
    }

    #[test]
    fn role_from_wire_defaults_to_staff() {
        assert_eq!(Role::from_wire("admin"), Role::Admin);
        assert_eq!(Role::from_wire("staff"), Role::Staff);
        assert_eq!(Role::from_wire("superuser"), Role::Staff);
    }
}
