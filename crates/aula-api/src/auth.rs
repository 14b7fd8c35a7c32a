// Authentication and unauthenticated endpoints
//
// Login exchanges username/password for a JWT access token plus the
// identity record. The token is NOT installed on the client here --
// the session layer decides whether the identity is acceptable first
// (admin dashboards reject staff logins outright).

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::types::{ContactMessage, LoginResponse};

impl GatewayClient {
    /// Authenticate with the backend. Returns the access token and
    /// identity on success; a non-2xx response is reported as
    /// [`Error::Authentication`] (the backend answers 401 for bad
    /// credentials, which here means "login rejected", not "session
    /// expired" -- there is no session yet).
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        match self.post::<LoginResponse>("/api/auth/login", &body).await {
            Ok(resp) => {
                debug!(username, "login successful");
                Ok(resp)
            }
            Err(Error::Unauthorized) => Err(Error::Authentication {
                message: "invalid credentials".into(),
            }),
            Err(Error::RequestFailed { message, .. }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }

    /// Submit a contact-form message. Works without a session; the
    /// bearer header is simply absent when nobody is logged in.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), Error> {
        self.post_unit("/api/contact", message).await
    }
}
