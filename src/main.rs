//! Command-line front end for the Addy provider.
//!
//! Configures the provider the same way a host would and prints data source
//! state as JSON on stdout. Diagnostics and logs go to stderr.

use std::process::ExitCode;

use addy_provider::config::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use addy_provider::schema::has_errors;
use addy_provider::{
    init_logging_with_default, AddyProvider, ApiConfig, Diagnostic, DiagnosticSeverity,
    ProviderService,
};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "addy-provider", version, about = "Addy.io provider")]
struct Cli {
    /// Addy.io API key
    #[arg(long, env = "ADDY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Service root
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API version segment
    #[arg(long, default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the provider schema
    Schema,
    /// Configure the provider and read one data source
    Read {
        /// Data source type name, e.g. addy_api_token_details
        data_source: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging_with_default(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let provider =
        AddyProvider::default().with_api_config(ApiConfig::new(cli.base_url, cli.api_version));

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&provider.schema())?);
        },
        Command::Read { data_source } => {
            let config = match cli.api_key {
                Some(api_key) => json!({ "api_key": api_key }),
                None => json!({}),
            };

            let diagnostics = provider.configure(config).await?;
            report(&diagnostics);
            if has_errors(&diagnostics) {
                return Err("provider configuration failed".into());
            }

            let state = provider.read_data_source(&data_source, json!({})).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        },
    }

    Ok(())
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let label = match diagnostic.severity {
            DiagnosticSeverity::Error => "Error",
            DiagnosticSeverity::Warning => "Warning",
        };
        match &diagnostic.attribute {
            Some(attribute) => eprintln!("{}: {} (at {})", label, diagnostic.summary, attribute),
            None => eprintln!("{}: {}", label, diagnostic.summary),
        }
        if let Some(detail) = &diagnostic.detail {
            eprintln!("  {}", detail);
        }
    }
}
