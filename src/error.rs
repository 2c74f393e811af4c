//! Error types for the Addy provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors produced by the API client and the provider surface.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing, empty or unresolved provider configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The liveness probe could not reach the service.
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// The liveness probe answered with a 4xx status.
    #[error("Request side error status code: {0}")]
    ClientStatus(u16),

    /// The liveness probe answered with a 5xx status.
    #[error("Server side error status code: {0}")]
    ServerStatus(u16),

    /// The liveness probe answered with a status outside any known range.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// An API call returned a non-2xx status.
    #[error("API request failed with status {status}: {body}")]
    ApiRequest {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The request could not be constructed (bad method, URL or header value).
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// The request could not be sent.
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    ResponseBody(#[source] reqwest::Error),

    /// A response body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The requested resource or data source type is not registered.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The operation is registered but has no implementation yet.
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// Input did not match the schema.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ProviderError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ClientStatus(status)
            | Self::ServerStatus(status)
            | Self::UnexpectedStatus(status)
            | Self::ApiRequest { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short, operator-facing title used as the diagnostic summary.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Invalid Provider Configuration",
            Self::Connectivity(_) | Self::Transport(_) => "Unable to Reach Addy API",
            Self::ClientStatus(_) | Self::ServerStatus(_) | Self::UnexpectedStatus(_) => {
                "Addy API Health Check Failed"
            },
            Self::ApiRequest { .. } => "Addy API Request Failed",
            Self::RequestBuild(_) => "Unable to Build Addy API Request",
            Self::ResponseBody(_) => "Unable to Read Addy API Response",
            Self::Decode(_) => "Unable to Parse Addy API Response",
            Self::UnknownResource(_) => "Unknown Resource Type",
            Self::Unimplemented(_) => "Not Implemented",
            Self::Validation(_) => "Invalid Configuration",
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        Diagnostic::error(err.summary()).with_detail(err.to_string())
    }
}
