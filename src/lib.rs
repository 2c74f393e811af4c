//! Addy.io provider
//!
//! This crate exposes the [Addy.io](https://addy.io) email alias service as an
//! infrastructure provider: a configurable provider block, a set of data
//! sources and a resource type, all backed by one authenticated REST client.
//!
//! # Overview
//!
//! - **[`AddyClient`]**: builds the HTTP client, probes the service root once,
//!   and performs authenticated requests against `https://app.addy.io/api/v1`
//! - **[`ProviderService`]**: the capability trait a host dispatches to
//! - **[`AddyProvider`]**: resolves the API key, configures the client and
//!   serves the data sources and resources below
//! - **Schema & diagnostics**: typed descriptions of every block and the
//!   errors/warnings reported back to the operator
//! - **Logging**: `tracing` integration, written to stderr
//!
//! # Quick Start
//!
//! ```ignore
//! use addy_provider::{AddyProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     addy_provider::init_logging();
//!
//!     let provider = AddyProvider::default();
//!     let diagnostics = provider.configure(json!({"api_key": "..."})).await?;
//!     assert!(diagnostics.is_empty());
//!
//!     let state = provider
//!         .read_data_source("addy_api_token_details", json!({}))
//!         .await?;
//!     println!("{}", state["name"]);
//!     Ok(())
//! }
//! ```
//!
//! # Credentials
//!
//! The API key comes from the provider's `api_key` attribute, or from the
//! `ADDY_API_KEY` environment variable when the attribute is null. An empty
//! or whitespace-only key is rejected before any request is made.
//!
//! # Data Sources
//!
//! | Type name                | Endpoint             |
//! |--------------------------|----------------------|
//! | `addy_api_token_details` | `api-token-details`  |
//! | `addy_app_version`       | `app-version`        |
//! | `addy_domain_options`    | `domain-options`     |
//!
//! `addy_domain`, `addy_alias` and `addy_aliases` are registered but answer
//! with [`ProviderError::Unimplemented`], as does every lifecycle operation of
//! the `addy_domain` resource.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::{AddyClient, StatusClass};
pub use config::{ApiConfig, API_KEY_ENV_VAR};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{AddyProvider, ProviderData, ProviderService, PROVIDER_TYPE_NAME};
pub use schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
pub use types::ProviderMetadata;
pub use validation::{is_valid, validate};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
