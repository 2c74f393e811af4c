//! Provider configuration.
//!
//! [`ApiConfig`] holds where the Addy API lives. [`resolve_api_key`] turns the
//! provider's `api_key` attribute plus the `ADDY_API_KEY` environment
//! fallback into a usable credential, or into diagnostics the host can show.

use serde_json::Value;

use crate::schema::Diagnostic;

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://app.addy.io";

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Environment variable consulted when the configuration omits `api_key`.
pub const API_KEY_ENV_VAR: &str = "ADDY_API_KEY";

/// Name of the provider configuration attribute holding the key.
pub const API_KEY_ATTRIBUTE: &str = "api_key";

/// Placeholder a host sends for values it cannot know until apply time.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// Location of the Addy REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    api_version: String,
}

impl ApiConfig {
    /// Create a configuration for the given service root and API version.
    pub fn new(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into().trim_matches('/').to_string(),
        }
    }

    /// Service root, probed once when the client is created.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API version segment, e.g. `v1`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `<base>/api/<version>`
    pub fn api_root(&self) -> String {
        format!("{}/api/{}", self.base_url, self.api_version)
    }

    /// Full URL for an endpoint path segment.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root(), endpoint.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_VERSION)
    }
}

/// State of a configuration attribute as sent by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Absent or explicitly null.
    Null,
    /// Not known until another resource is applied.
    Unknown,
    /// A concrete value.
    Known(String),
}

impl ConfigValue {
    /// Read a string attribute out of a provider configuration object.
    ///
    /// Non-string values are treated as null; schema validation reports them.
    pub fn from_config(config: &Value, attribute: &str) -> Self {
        match config.get(attribute).and_then(Value::as_str) {
            None => Self::Null,
            Some(UNKNOWN_VALUE) => Self::Unknown,
            Some(value) => Self::Known(value.to_string()),
        }
    }
}

/// Resolve the API key from configuration, falling back to the environment.
///
/// A non-null configured value wins over `env_value`. Unknown values and
/// empty or whitespace-only results are reported as error diagnostics on
/// the `api_key` attribute.
pub fn resolve_api_key(
    configured: ConfigValue,
    env_value: Option<String>,
) -> Result<String, Diagnostic> {
    let api_key = match configured {
        ConfigValue::Unknown => {
            return Err(Diagnostic::error("Unknown Addy.io API Key")
                .with_detail(format!(
                    "The provider cannot create the Addy API client as there is an unknown \
                     configuration value for the Addy API key. Either target apply the source \
                     of the value first, set the value statically in the configuration, or use \
                     the {} environment variable.",
                    API_KEY_ENV_VAR
                ))
                .with_attribute(API_KEY_ATTRIBUTE));
        },
        ConfigValue::Known(value) => value,
        ConfigValue::Null => env_value.unwrap_or_default(),
    };

    if api_key.trim().is_empty() {
        return Err(Diagnostic::error("Missing Addy API Key")
            .with_detail(format!(
                "The provider cannot create the Addy API client as there is a missing or empty \
                 value for the Addy API key. Set the key value in the configuration or use the \
                 {} environment variable. If either is already set, ensure the value is not \
                 empty.",
                API_KEY_ENV_VAR
            ))
            .with_attribute(API_KEY_ATTRIBUTE));
    }

    Ok(api_key)
}
