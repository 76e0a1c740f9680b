//! Fetch helpers shared by the provider crates.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ports::PortError;

/// Default upper bound on a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Settings applied to every HTTP client kerbside builds.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// User-Agent header; Nominatim refuses anonymous clients.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("kerbside/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpSettings {
    /// Shared, stateless client.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Network`] if the TLS backend cannot be initialised.
    pub fn client(&self) -> Result<Client, PortError> {
        Ok(Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?)
    }

    /// Fresh client with its own cookie jar, for one session-based exchange.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Network`] if the TLS backend cannot be initialised.
    pub fn session(&self) -> Result<Client, PortError> {
        Ok(Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .cookie_store(true)
            .build()?)
    }
}

/// Send a request and return the body, failing on non-success statuses.
///
/// # Errors
///
/// Returns [`PortError::Network`] on transport failures and error statuses.
pub async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    let response = req.send().await?.error_for_status()?;
    debug!(url = %response.url(), status = %response.status(), "upstream response");
    Ok(response.text().await?)
}

/// Send a request and decode a JSON body.
///
/// # Errors
///
/// Returns [`PortError::Network`] on transport failures and error statuses,
/// [`PortError::Parse`] when the body does not decode as `T`.
pub async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let body = fetch_text(req).await?;
    decode_json(&body)
}

/// Decode a JSON payload, reporting shape mismatches as parse errors.
///
/// # Errors
///
/// Returns [`PortError::Parse`] when `body` does not decode as `T`.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, PortError> {
    serde_json::from_str(body).map_err(|err| PortError::Parse(err.to_string()))
}
