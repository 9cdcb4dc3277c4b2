//! # granary-config
//!
//! Layered configuration loading for granary using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GRANARY_*` prefix, `__` as separator)
//! 2. Project-level `.granary/config.toml`
//! 3. User-level `~/.config/granary/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GRANARY_HARVEST__PER_PAGE` -> `harvest.per_page`,
//! `GRANARY_OUTPUT__DIR` -> `output.dir`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use granary_config::GranaryConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = GranaryConfig::load_with_dotenv().expect("config");
//! println!("output dir: {}", config.output.dir);
//! ```

mod error;
mod fetch;
mod harvest;
mod output;
mod report;

pub use error::ConfigError;
pub use fetch::FetchConfig;
pub use harvest::HarvestConfig;
pub use output::OutputConfig;
pub use report::ReportConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GranaryConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl GranaryConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when figment extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when figment extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".granary/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("GRANARY_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("granary").join("config.toml"))
    }
}
