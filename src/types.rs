//! Typed records returned by the Addy API and provider metadata.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Provider metadata: the names of everything the provider registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// Provider type name, used as the prefix of every type name.
    pub type_name: String,
    /// Provider version.
    pub version: String,
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}

/// Body of `GET /api/v1/api-token-details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTokenDetails {
    /// The name of the API token.
    pub name: String,
    /// The creation timestamp of the API token.
    pub created_at: String,
    /// The expiration timestamp; `None` if the token never expires.
    pub expires_at: Option<String>,
}

impl ApiTokenDetails {
    /// Data source state for these details.
    pub fn to_state(&self) -> Value {
        json!({
            "id": "api-token-details",
            "name": self.name,
            "created_at": self.created_at,
            "expires_at": self.expires_at,
        })
    }
}

/// Body of `GET /api/v1/app-version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    /// Full version string, e.g. `1.2.3`.
    pub version: String,
    /// Major component.
    pub major: i64,
    /// Minor component.
    pub minor: i64,
    /// Patch component.
    pub patch: i64,
}

impl AppVersion {
    /// Data source state for this version.
    pub fn to_state(&self) -> Value {
        json!({
            "id": "app-version",
            "version": self.version,
            "major": self.major,
            "minor": self.minor,
            "patch": self.patch,
        })
    }
}

/// Body of `GET /api/v1/domain-options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOptions {
    /// Domains the account may create aliases on.
    pub data: Vec<String>,
    /// Domain used when none is specified.
    pub default_alias_domain: Option<String>,
    /// Alias format used when none is specified.
    pub default_alias_format: Option<String>,
}

impl DomainOptions {
    /// Data source state for these options.
    pub fn to_state(&self) -> Value {
        json!({
            "id": "domain-options",
            "domains": self.data,
            "default_alias_domain": self.default_alias_domain,
            "default_alias_format": self.default_alias_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_details_without_expiry() {
        let details: ApiTokenDetails = serde_json::from_str(
            r#"{"name":"test","created_at":"2024-01-01T00:00:00Z","expires_at":null}"#,
        )
        .unwrap();
        assert_eq!(details.name, "test");
        assert!(details.expires_at.is_none());

        let state = details.to_state();
        assert_eq!(state["id"], "api-token-details");
        assert_eq!(state["created_at"], "2024-01-01T00:00:00Z");
        assert!(state["expires_at"].is_null());
    }

    #[test]
    fn test_token_details_with_expiry() {
        let details: ApiTokenDetails = serde_json::from_str(
            r#"{"name":"ci","created_at":"2024-01-01T00:00:00Z","expires_at":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(details.to_state()["expires_at"], "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_token_details_missing_field_fails() {
        let result = serde_json::from_str::<ApiTokenDetails>(r#"{"name":"test"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_domain_options_camel_case() {
        let options: DomainOptions = serde_json::from_str(
            r#"{"data":["anonaddy.me","addy.io"],"defaultAliasDomain":"addy.io","defaultAliasFormat":"random_characters"}"#,
        )
        .unwrap();
        let state = options.to_state();
        assert_eq!(state["domains"][1], "addy.io");
        assert_eq!(state["default_alias_domain"], "addy.io");
        assert_eq!(state["default_alias_format"], "random_characters");
    }

    #[test]
    fn test_app_version_state() {
        let version = AppVersion {
            version: "1.3.2".to_string(),
            major: 1,
            minor: 3,
            patch: 2,
        };
        let state = version.to_state();
        assert_eq!(state["id"], "app-version");
        assert_eq!(state["minor"], 3);
    }
}
