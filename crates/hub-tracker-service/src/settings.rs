//! Layered configuration loading.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `/etc/hub-tracker/service.yaml`
//! 2. `./config/service.yaml`
//! 3. The file given by `--config` or `HT_CONFIG_FILE`
//! 4. Environment variables prefixed `HT__`, e.g. `HT__TRACKER__SECRET`
//!
//! Every field carries a serde default, so missing files are fine. A file that
//! cannot be parsed, or a value of the wrong type, is a hard error.

use anyhow::Context;
use clap::Parser;
use hub_tracker_api::ServiceConfig;
use std::path::{Path, PathBuf};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "hub-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Receive GitHub webhooks for one repository and report commit statuses")]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, env = "HT_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Build the service configuration from all sources and apply CLI overrides.
///
/// `environment` is normally [`environment_source`]; tests pass a fixed map.
pub fn load_config(
    cli: &Cli,
    environment: config::Environment,
) -> anyhow::Result<ServiceConfig> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/hub-tracker/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Some(path) = explicit_path(cli.config.as_deref()) {
        builder = builder.add_source(
            config::File::with_name(&path)
                .required(true)
                .format(config::FileFormat::Yaml),
        );
    }

    let mut service_config: ServiceConfig = builder
        .add_source(environment)
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Could not deserialize service configuration")?;

    if let Some(port) = cli.port {
        service_config.server.port = port;
    }

    service_config
        .validate()
        .context("Service configuration is invalid")?;

    Ok(service_config)
}

/// Environment source with the `HT` prefix and `__` separator.
///
/// Values are parsed into numbers and booleans where possible; `tracker.events`
/// is read as a comma-separated list.
pub fn environment_source() -> config::Environment {
    config::Environment::with_prefix("HT")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("tracker.events")
}

fn explicit_path(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
