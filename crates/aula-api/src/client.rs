// Gateway HTTP client
//
// Wraps `reqwest::Client` with bearer-credential injection and response
// classification. This is the only component in the workspace that
// issues authenticated requests; everything above it sees classified
// `Error` values, never raw HTTP.

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Shape of the backend's error bodies: `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Async client for the facility backend REST API.
///
/// The bearer token is a swappable slot: the session layer installs it
/// after login and removes it on logout, and every request reads the
/// current value. Requests without a token simply omit the header, so
/// unauthenticated endpoints (login, contact form) share the same path.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: ArcSwapOption<SecretString>,
}

impl GatewayClient {
    /// Create a new gateway client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            bearer: ArcSwapOption::empty(),
        })
    }

    /// Wrap a pre-built `reqwest::Client` (tests, shared transports).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            bearer: ArcSwapOption::empty(),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install the bearer token used for subsequent requests.
    pub fn set_bearer(&self, token: SecretString) {
        self.bearer.store(Some(std::sync::Arc::new(token)));
    }

    /// Remove the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_bearer(&self) {
        self.bearer.store(None);
    }

    /// Whether a bearer token is currently installed.
    pub fn has_bearer(&self) -> bool {
        self.bearer.load().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(Error::Unreachable)?;

        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(Error::Unreachable)?;

        Self::decode(resp).await
    }

    /// Send a POST request where only success/failure matters.
    pub(crate) async fn post_unit(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(Error::Unreachable)?;

        Self::classify(resp).await.map(|_| ())
    }

    /// Send a DELETE request, ignoring any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);

        let resp = self
            .authorized(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Unreachable)?;

        Self::classify(resp).await.map(|_| ())
    }

    /// Attach the bearer header when a credential is installed.
    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.load_full() {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }

    /// Classify the response status, returning the raw body on success.
    ///
    /// 401 maps to [`Error::Unauthorized`] so the session layer can force
    /// re-authentication; every other non-2xx becomes `RequestFailed`
    /// with the backend's error message when the body carries one.
    async fn classify(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        let body = resp.text().await.map_err(Error::Unreachable)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Classify, then decode the success body as JSON.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::classify(resp).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
