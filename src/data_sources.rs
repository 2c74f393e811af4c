//! Data sources exposed by the Addy provider.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ProviderError;
use crate::provider::ProviderData;
use crate::schema::{Attribute, Schema};
use crate::types::{ApiTokenDetails, AppVersion, DomainOptions};

/// Every data source the provider registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    /// `addy_api_token_details`
    ApiTokenDetails,
    /// `addy_app_version`
    AppVersion,
    /// `addy_domain_options`
    DomainOptions,
    /// `addy_domain`
    Domain,
    /// `addy_alias`
    Alias,
    /// `addy_aliases`
    Aliases,
}

impl DataSourceKind {
    /// All registered data sources.
    pub const ALL: [DataSourceKind; 6] = [
        Self::ApiTokenDetails,
        Self::AppVersion,
        Self::DomainOptions,
        Self::Domain,
        Self::Alias,
        Self::Aliases,
    ];

    /// Type name as seen by the host.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::ApiTokenDetails => "addy_api_token_details",
            Self::AppVersion => "addy_app_version",
            Self::DomainOptions => "addy_domain_options",
            Self::Domain => "addy_domain",
            Self::Alias => "addy_alias",
            Self::Aliases => "addy_aliases",
        }
    }

    /// Look up a data source by type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Whether reading this data source does anything yet.
    pub fn is_implemented(self) -> bool {
        matches!(
            self,
            Self::ApiTokenDetails | Self::AppVersion | Self::DomainOptions
        )
    }

    /// Error returned when reading a data source that is registered but not built.
    pub fn unimplemented(self) -> ProviderError {
        ProviderError::Unimplemented(format!(
            "data source {} cannot be read yet",
            self.type_name()
        ))
    }

    /// Schema of the state this data source produces.
    pub fn schema(self) -> Schema {
        match self {
            Self::ApiTokenDetails => Schema::v0()
                .with_description("Fetches details about the current API token.")
                .with_attribute(
                    "id",
                    Attribute::computed_string()
                        .with_description("Placeholder identifier attribute."),
                )
                .with_attribute(
                    "name",
                    Attribute::computed_string().with_description("The name of the API token."),
                )
                .with_attribute(
                    "created_at",
                    Attribute::computed_string()
                        .with_description("The creation timestamp of the API token."),
                )
                .with_attribute(
                    "expires_at",
                    Attribute::computed_string().with_description(
                        "The expiration timestamp of the API token. Null if the token doesn't expire.",
                    ),
                ),
            Self::AppVersion => Schema::v0()
                .with_description("Fetches the version of the Addy.io instance.")
                .with_attribute("id", Attribute::computed_string())
                .with_attribute(
                    "version",
                    Attribute::computed_string().with_description("Full version string."),
                )
                .with_attribute("major", Attribute::computed_int64())
                .with_attribute("minor", Attribute::computed_int64())
                .with_attribute("patch", Attribute::computed_int64()),
            Self::DomainOptions => Schema::v0()
                .with_description("Fetches the domains available for new aliases.")
                .with_attribute("id", Attribute::computed_string())
                .with_attribute(
                    "domains",
                    Attribute::computed_string_list()
                        .with_description("Domains aliases can be created on."),
                )
                .with_attribute(
                    "default_alias_domain",
                    Attribute::computed_string()
                        .with_description("Domain used when none is given."),
                )
                .with_attribute(
                    "default_alias_format",
                    Attribute::computed_string()
                        .with_description("Alias format used when none is given."),
                ),
            Self::Domain | Self::Alias | Self::Aliases => Schema::v0(),
        }
    }

    /// Query the API and build this data source's state.
    #[instrument(skip(self, data), fields(data_source = self.type_name()))]
    pub async fn read(self, data: &ProviderData) -> Result<Value, ProviderError> {
        let state = match self {
            Self::ApiTokenDetails => {
                debug!("Reading API token details");
                let details: ApiTokenDetails = data.get_json("api-token-details").await?;
                debug!(
                    name = %details.name,
                    created_at = %details.created_at,
                    expires_at = ?details.expires_at,
                    "API token details read successfully"
                );
                details.to_state()
            },
            Self::AppVersion => {
                let version: AppVersion = data.get_json("app-version").await?;
                debug!(version = %version.version, "App version read successfully");
                version.to_state()
            },
            Self::DomainOptions => {
                let options: DomainOptions = data.get_json("domain-options").await?;
                debug!(domains = options.data.len(), "Domain options read successfully");
                options.to_state()
            },
            Self::Domain | Self::Alias | Self::Aliases => return Err(self.unimplemented()),
        };
        Ok(state)
    }
}
