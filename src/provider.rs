//! The provider capability trait and the Addy implementation of it.
//!
//! [`ProviderService`] is the surface a host dispatches to: configure the
//! provider once, then read data sources and drive resource lifecycles by
//! type name. [`AddyProvider`] implements it on top of [`AddyClient`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::client::AddyClient;
use crate::config::{resolve_api_key, ApiConfig, ConfigValue, API_KEY_ATTRIBUTE, API_KEY_ENV_VAR};
use crate::data_sources::DataSourceKind;
use crate::error::ProviderError;
use crate::resources::{Operation, ResourceKind};
use crate::schema::{has_errors, Attribute, Diagnostic, ProviderSchema, Schema};
use crate::types::ProviderMetadata;
use crate::validation::validate;

/// Provider type name; every resource and data source name starts with it.
pub const PROVIDER_TYPE_NAME: &str = "addy";

/// Trait that provider implementations must implement.
///
/// Methods take JSON values so that any host encoding can sit in front of
/// them. Validation hooks default to checking against [`Self::schema`].
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Provider type name.
    fn type_name(&self) -> &str;

    /// Provider version.
    fn version(&self) -> &str;

    /// Return the provider's schema including all resources and data sources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata, derived from the schema by default.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        let mut resources: Vec<_> = schema.resources.into_keys().collect();
        let mut data_sources: Vec<_> = schema.data_sources.into_keys().collect();
        resources.sort();
        data_sources.sort();
        ProviderMetadata {
            type_name: self.type_name().to_string(),
            version: self.version().to_string(),
            resources,
            data_sources,
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&self.schema().provider, &config))
    }

    /// Configure the provider with credentials and settings.
    /// Returns diagnostics (errors and warnings).
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.schema();
        let resource = schema
            .resources
            .get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))?;
        Ok(validate(resource, &config))
    }

    /// Create a new resource.
    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Read the current state of a resource.
    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Update an existing resource.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError>;

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    /// Validate a data source's configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.schema();
        let data_source = schema
            .data_sources
            .get(data_source_type)
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))?;
        Ok(validate(data_source, &config))
    }

    /// Read data from an external source.
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError>;
}

/// Shared configuration handed to every data source and resource call.
#[derive(Clone)]
pub struct ProviderData {
    /// Client created during configuration.
    pub client: AddyClient,
    api_key: String,
}

impl ProviderData {
    /// Bundle a connected client with its credential.
    pub fn new(client: AddyClient, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// The resolved API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Authenticated GET decoded as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ProviderError> {
        self.client.get_json(endpoint, &self.api_key).await
    }
}

impl std::fmt::Debug for ProviderData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderData")
            .field("client", &self.client)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The Addy.io provider.
pub struct AddyProvider {
    version: String,
    api: ApiConfig,
    api_key_env: String,
    data: RwLock<Option<Arc<ProviderData>>>,
}

impl AddyProvider {
    /// Create an unconfigured provider reporting `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            api: ApiConfig::default(),
            api_key_env: API_KEY_ENV_VAR.to_string(),
            data: RwLock::new(None),
        }
    }

    /// Point the provider at a different Addy deployment.
    pub fn with_api_config(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Read the fallback API key from a different environment variable.
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// The data published by the last successful [`ProviderService::configure`].
    pub async fn provider_data(&self) -> Result<Arc<ProviderData>, ProviderError> {
        self.data.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "the provider has not been configured; call configure first".to_string(),
            )
        })
    }

    fn resource_kind(resource_type: &str) -> Result<ResourceKind, ProviderError> {
        ResourceKind::from_type_name(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn provider_config_schema() -> Schema {
        Schema::v0().with_attribute(
            API_KEY_ATTRIBUTE,
            Attribute::optional_string()
                .with_description(
                    "Addy.io API key. May also be provided via the ADDY_API_KEY environment variable.",
                )
                .sensitive(),
        )
    }
}

impl Default for AddyProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait::async_trait]
impl ProviderService for AddyProvider {
    fn type_name(&self) -> &str {
        PROVIDER_TYPE_NAME
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn schema(&self) -> ProviderSchema {
        let schema = ProviderSchema::new().with_provider_config(Self::provider_config_schema());
        let schema = DataSourceKind::ALL
            .into_iter()
            .fold(schema, |schema, kind| {
                schema.with_data_source(kind.type_name(), kind.schema())
            });
        ResourceKind::ALL
            .into_iter()
            .fold(schema, |schema, kind| {
                schema.with_resource(kind.type_name(), kind.schema())
            })
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        info!("Configuring Addy client");
        self.data.write().await.take();

        let mut diagnostics = self.validate_provider_config(config.clone()).await?;
        if has_errors(&diagnostics) {
            warn!(diagnostics = diagnostics.len(), "Provider configuration is invalid");
            return Ok(diagnostics);
        }

        let configured = ConfigValue::from_config(&config, API_KEY_ATTRIBUTE);
        let env_value = std::env::var(&self.api_key_env).ok();
        let api_key = match resolve_api_key(configured, env_value) {
            Ok(api_key) => api_key,
            Err(diagnostic) => {
                warn!(summary = %diagnostic.summary, "API key could not be resolved");
                diagnostics.push(diagnostic);
                return Ok(diagnostics);
            },
        };

        let client = match AddyClient::connect(self.api.clone()).await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Unable to create Addy API client");
                diagnostics.push(
                    Diagnostic::error("Unable to Create Addy API Client").with_detail(format!(
                        "An unexpected error occurred when creating the Addy API client. \
                         If the error is not clear, please contact the provider developers.\n\n\
                         Addy Client Error: {}",
                        e
                    )),
                );
                return Ok(diagnostics);
            },
        };

        *self.data.write().await = Some(Arc::new(ProviderData::new(client, api_key)));
        info!("Configured Addy client");
        Ok(diagnostics)
    }

    async fn create(
        &self,
        resource_type: &str,
        _planned_state: Value,
    ) -> Result<Value, ProviderError> {
        Err(Self::resource_kind(resource_type)?.unimplemented(Operation::Create))
    }

    async fn read(
        &self,
        resource_type: &str,
        _current_state: Value,
    ) -> Result<Value, ProviderError> {
        Err(Self::resource_kind(resource_type)?.unimplemented(Operation::Read))
    }

    async fn update(
        &self,
        resource_type: &str,
        _prior_state: Value,
        _planned_state: Value,
    ) -> Result<Value, ProviderError> {
        Err(Self::resource_kind(resource_type)?.unimplemented(Operation::Update))
    }

    async fn delete(
        &self,
        resource_type: &str,
        _current_state: Value,
    ) -> Result<(), ProviderError> {
        Err(Self::resource_kind(resource_type)?.unimplemented(Operation::Delete))
    }

    #[instrument(skip(self, config))]
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let kind = DataSourceKind::from_type_name(data_source_type)
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))?;

        let errors: Vec<_> = validate(&kind.schema(), &config)
            .into_iter()
            .filter(Diagnostic::is_error)
            .map(|d| d.summary)
            .collect();
        if !errors.is_empty() {
            return Err(ProviderError::Validation(errors.join("; ")));
        }

        // Stubs fail the same way whether or not configure has run.
        if !kind.is_implemented() {
            return Err(kind.unimplemented());
        }

        let data = self.provider_data().await?;
        let state = kind.read(&data).await?;
        debug!("Data source read");
        Ok(state)
    }
}
