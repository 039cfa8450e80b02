//! # Configuration
//!
//! Loads the exporter configuration once at startup. The YAML file named on the command line is required,
//! environment variables prefixed with `RDS_EXPORTER__` override individual keys (e.g.
//! `RDS_EXPORTER__CREDENTIAL__REGION_ID`).
//!
//! Incomplete credentials are a fatal error: [`Config::load`] refuses to produce a [`Config`] without them.

#[macro_use]
extern crate tracing;

mod args;
mod collector_config;
mod credential;
mod server_config;

pub use aliyun_rds_client::Credentials;
pub use args::Args;
pub use collector_config::{
    CollectorConfig,
    TtlConfig,
};
use credential::RawCredential;
use eyre::{
    ensure,
    Context as _,
    Result,
};
use serde::Deserialize;
pub use server_config::ServerConfig;
use std::{
    collections::BTreeMap,
    path::Path,
};

const ENV_PREFIX: &str = "RDS_EXPORTER";
const ENV_SEPARATOR: &str = "__";

/// The configuration file, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    credential: RawCredential,
    #[serde(default)]
    performance_list: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    collector: CollectorConfig,
}

/// Validated, immutable exporter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub credential: Credentials,
    /// Engine name to the ordered list of performance keys queried for instances of that engine.
    pub performance_list: BTreeMap<String, Vec<String>>,
    pub collector: CollectorConfig,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        Self::load(&args.config)
    }

    /// Read the config file at `path`, apply environment overrides and validate the result.
    pub fn load(path: &Path) -> Result<Self> {
        ensure_readable(path)?;

        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .wrap_err_with(|| format!("Failed to read config file {path:?}"))?
            .try_deserialize()
            .wrap_err_with(|| format!("Invalid config file {path:?}"))?;

        let config = Self::try_from(raw)?;
        debug!(?path, engines = config.performance_list.len(), "loaded config");
        Ok(config)
    }

    /// Performance keys configured for `engine`. Engine names are matched case-insensitively.
    pub fn performance_keys(&self, engine: &str) -> &[String] {
        self.performance_list
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(engine))
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or_default()
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = eyre::Report;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let credential = Credentials::try_from(raw.credential)?;
        ensure!(raw.collector.page_size > 0, "collector.page_size must be at least 1");
        ensure!(raw.collector.workers > 0, "collector.workers must be at least 1");
        ensure!(
            raw.server.metrics_path.starts_with('/'),
            "server.metrics_path must start with '/'"
        );
        if raw.performance_list.is_empty() {
            warn!("performance_list is empty, no performance metrics will be collected");
        }

        Ok(Self {
            server: raw.server,
            credential,
            performance_list: raw.performance_list,
            collector: raw.collector,
        })
    }
}

fn ensure_readable(path: &Path) -> Result<()> {
    std::fs::File::open(path)
        .map(drop)
        .wrap_err_with(|| format!("Config file {path:?} not found or not accessible"))
}
