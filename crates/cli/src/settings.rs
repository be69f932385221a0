//! Configuration loading.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `ISSUER_*` environment variables. Command-line flags are applied on
//! top by the caller.

use anyhow::{Context, Result};
use config::{Config, File as ConfigFile};
use issuer_registry::IssuerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "issuer.toml";
pub const DEFAULT_ISSUER_NAME: &str = "Claim Issuer";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub name: String,
    pub public_key: Option<String>,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_format: String,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("issuer-registry"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Settings {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        let data_dir = default_data_dir();
        let mut builder = Config::builder()
            .set_default("name", DEFAULT_ISSUER_NAME)?
            .set_default("data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?;

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }

        builder = builder.add_source(config::Environment::with_prefix("ISSUER"));

        let settings: Settings = builder
            .build()?
            .try_deserialize()
            .context("invalid issuer configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "pretty" | "compact") {
            anyhow::bail!(
                "Unsupported log format '{}' (expected 'pretty' or 'compact')",
                self.log_format
            );
        }
        Ok(())
    }

    /// Registry configuration; fails when no owner public key is set.
    pub fn issuer_config(&self) -> Result<IssuerConfig> {
        let public_key = self
            .public_key
            .as_deref()
            .context("owner public key not configured (set public_key or ISSUER_PUBLIC_KEY)")?;
        IssuerConfig::from_public_key_hex(&self.name, public_key)
            .context("invalid issuer configuration")
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }
}
