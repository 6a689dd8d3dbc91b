//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `SHELF__`-prefixed environment variables. Each sub-module
//! represents a logical configuration section.

pub mod database;
pub mod enrichment;
pub mod folders;
pub mod logging;
pub mod realtime;
pub mod search;
pub mod share;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::enrichment::{EnrichmentConfig, KeywordConfig, PageInfoConfig};
pub use self::folders::FolderConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::search::SearchConfig;
pub use self::share::ShareConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`SHELF__DATABASE__URL`, ...).
const ENV_PREFIX: &str = "SHELF";

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration sources
/// (default file + environment overlay + environment variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Search engine settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Folder repository settings.
    #[serde(default)]
    pub folders: FolderConfig,
    /// Change-feed settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// External enrichment collaborators.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    /// Public share link settings.
    #[serde(default)]
    pub share: ShareConfig,
}

impl AppConfig {
    /// Load configuration for an environment.
    ///
    /// Merges `config/default` with an optional `config/{env}` overlay and
    /// environment variables prefixed with `SHELF__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        Self::finish(builder)
    }

    /// Load configuration from an explicit file path, still honouring
    /// environment variable overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));
        Self::finish(builder)
    }

    /// Parse configuration from an inline TOML document (no env overrides).
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
