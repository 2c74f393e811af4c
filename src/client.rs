//! HTTP client for the Addy REST API.
//!
//! [`AddyClient::connect`] builds the underlying `reqwest` client and probes
//! the service root once. [`AddyClient::request`] performs a single
//! authenticated call and hands back the raw body.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, trace, warn};

use crate::config::ApiConfig;
use crate::error::ProviderError;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("addy-provider/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters written to logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body for logging and strip control characters.
fn sanitize_for_log(body: &str) -> String {
    let total = body.chars().count();
    let truncated: String = if total > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Coarse classification of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200-299
    Success,
    /// 300-399
    Redirection,
    /// 400-499
    ClientError,
    /// 500-599
    ServerError,
    /// Anything else.
    Unexpected,
}

impl StatusClass {
    /// Classify a raw status code.
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unexpected,
        }
    }
}

/// Authenticated client for one Addy deployment.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct AddyClient {
    http: Client,
    config: ApiConfig,
}

impl AddyClient {
    /// Build the HTTP client and verify the service root is reachable.
    ///
    /// 2xx and 3xx answers are accepted. 4xx, 5xx and any other status fail
    /// with the matching [`ProviderError`] variant; transport failures are
    /// returned as [`ProviderError::Connectivity`] and a base URL that cannot
    /// be parsed as [`ProviderError::RequestBuild`]. There is no retry.
    #[instrument(skip_all, fields(url = %config.base_url()))]
    pub async fn connect(config: ApiConfig) -> Result<Self, ProviderError> {
        debug!("Creating HTTP client");
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::RequestBuild(e.to_string()))?;

        trace!("Sending liveness probe");
        let response = http.get(config.base_url()).send().await.map_err(|e| {
            if e.is_builder() {
                error!(error = %e, "Invalid service root");
                return ProviderError::RequestBuild(e.to_string());
            }
            error!(error = %e, "Liveness probe failed");
            ProviderError::Connectivity(e)
        })?;
        let status = response.status();
        drop(response);

        match StatusClass::from_code(status.as_u16()) {
            StatusClass::Success => {
                debug!(%status, "Liveness probe succeeded");
                Ok(Self { http, config })
            },
            StatusClass::Redirection => {
                warn!(%status, "Liveness probe answered with a redirect");
                Ok(Self { http, config })
            },
            StatusClass::ClientError => {
                error!(%status, "Liveness probe rejected");
                Err(ProviderError::ClientStatus(status.as_u16()))
            },
            StatusClass::ServerError => {
                error!(%status, "Liveness probe hit a server error");
                Err(ProviderError::ServerStatus(status.as_u16()))
            },
            StatusClass::Unexpected => {
                error!(%status, "Liveness probe returned an unexpected status");
                Err(ProviderError::UnexpectedStatus(status.as_u16()))
            },
        }
    }

    /// Where this client sends requests.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Perform one authenticated request and return the raw response body.
    ///
    /// `endpoint` is appended to `<base>/api/<version>/`. `method` is parsed
    /// as an HTTP method; an invalid one fails before anything is sent.
    /// Non-2xx answers become [`ProviderError::ApiRequest`] carrying the
    /// status and the body text.
    #[instrument(skip(self, token))]
    pub async fn request(
        &self,
        endpoint: &str,
        method: &str,
        token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
            ProviderError::RequestBuild(format!("invalid method {:?}: {}", method, e))
        })?;
        let url = self.config.endpoint_url(endpoint);
        let url = Url::parse(&url)
            .map_err(|e| ProviderError::RequestBuild(format!("invalid url {:?}: {}", url, e)))?;

        let request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"))
            .build()
            .map_err(|e| ProviderError::RequestBuild(e.to_string()))?;

        trace!(url = %request.url(), "Sending request");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        debug!(%status, "Response received");

        // Read the whole body on every path so the connection goes back to the pool.
        let body = response
            .bytes()
            .await
            .map_err(ProviderError::ResponseBody)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            error!(%status, body = %sanitize_for_log(&body), "API request failed");
            return Err(ProviderError::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.to_vec())
    }

    /// GET an endpoint and return the raw body.
    pub async fn get(&self, endpoint: &str, token: &str) -> Result<Vec<u8>, ProviderError> {
        self.request(endpoint, "GET", token).await
    }

    /// GET an endpoint and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &str,
    ) -> Result<T, ProviderError> {
        let body = self.get(endpoint, token).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
