//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: PAGEWISE_, `__` separates nested keys)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/pagewise/{service_name}/config.toml
//! 4. System directory: /etc/pagewise/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "catalog"
//! log_level = "debug"
//!
//! [paging]
//! page_size = 50
//! sort_field = "created_at"
//! order = "asc"
//! ```
//!
//! The same page size can be set with `PAGEWISE_PAGING__PAGE_SIZE=50`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paging::SortDirection;

const APP_PREFIX: &str = "pagewise";
const ENV_PREFIX: &str = "PAGEWISE_";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Paging defaults
    #[serde(default)]
    pub paging: PagingDefaults,
}

/// Service-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Defaults applied to incomplete paging requests
///
/// Built once at start-up and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingDefaults {
    /// Page size when the client sends none; also the cursor mode maximum
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Sort field for offset mode
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// Field read for cursor tokens, compared in keyset predicates and used
    /// as the cursor mode sort field when the client sends none
    #[serde(default = "default_sort_field")]
    pub cursor_field: String,

    /// Direction when the client sends none
    #[serde(default)]
    pub order: SortDirection,
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_field: default_sort_field(),
            cursor_field: default_sort_field(),
            order: SortDirection::Desc,
        }
    }
}

impl PagingDefaults {
    /// Reject values the resolver cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfig(
                "paging.page_size must be greater than zero".to_string(),
            ));
        }
        for (key, value) in [
            ("sort_field", &self.sort_field),
            ("cursor_field", &self.cursor_field),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("paging.{key} must not be blank")));
            }
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_sort_field() -> String {
    "modified_at".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is taken from the running binary's file name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| APP_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    ///
    /// This is the recommended way to load config in production.
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!(paths = ?config_paths, "searching for config files");

        let mut figment = Figment::new().merge(Serialized::defaults(Config::for_service(service_name)));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!(path = %path.display(), "loading configuration");
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search paths. Environment variables still apply. A
    /// missing file leaves the defaults in place.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()));

        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.paging.validate()?;
        Ok(config)
    }

    fn for_service(service_name: &str) -> Self {
        let mut config = Config::default();
        config.service.name = service_name.to_string();
        config
    }

    /// Find all possible config file paths for a service
    ///
    /// Returns paths in priority order (highest first).
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX);
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(APP_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Get the recommended config path for a service
    ///
    /// Returns: ~/.config/pagewise/{service_name}/config.toml
    pub fn recommended_path(service_name: &str) -> PathBuf {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");

        xdg_dirs.place_config_file(&config_file_path).unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| String::from("~")))
                .join(".config")
                .join(APP_PREFIX)
                .join(config_file_path)
        })
    }

    /// Create the config directory structure for a service
    ///
    /// Creates ~/.config/pagewise/{service_name}/ if it doesn't exist
    pub fn create_config_dir(service_name: &str) -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");

        let config_path = xdg_dirs.place_config_file(&config_file_path)?;

        Ok(config_path
            .parent()
            .ok_or_else(|| Error::Internal("Invalid config path".to_string()))?
            .to_path_buf())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_PREFIX.to_string(),
                log_level: default_log_level(),
            },
            paging: PagingDefaults::default(),
        }
    }
}
