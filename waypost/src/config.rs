//! Defines `RouterConfig`, the settings shared by every request a `Router` serves.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::ConfigError;

/// The directory-index filename stripped from templates and request paths by default.
pub const DEFAULT_DIRECTORY_INDEX: &str = "index.php";

/// Settings for a `Router`.
///
/// ```rust
/// # use waypost::RouterConfig;
/// let config = RouterConfig::from_toml(
///     r#"
///     default_method = "index"
///     remove_directory_index = "index.html"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.default_method.as_deref(), Some("index"));
/// assert_eq!(config.remove_directory_index.as_deref(), Some("index.html"));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Controller method used when no conventional action can be inferred from the request path,
    /// and the method a route reverts to when its `except`/`only` filters reject an action.
    pub default_method: Option<String>,

    /// Filename removed from the end of URI templates and request paths, so `/blog/index.php`
    /// and `/blog` are routed alike. `None` disables the removal.
    pub remove_directory_index: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            default_method: None,
            remove_directory_index: Some(DEFAULT_DIRECTORY_INDEX.to_owned()),
        }
    }
}

impl RouterConfig {
    /// Parses a configuration from TOML text. Missing keys take their default values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(text)?;
        debug!(" loaded router configuration: {:?}", config);
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!(" reading router configuration from {}", path.display());
        let text = fs::read_to_string(path)?;
        RouterConfig::from_toml(&text)
    }

    /// Sets the default controller method.
    pub fn with_default_method<S>(mut self, method: S) -> Self
    where
        S: Into<String>,
    {
        self.default_method = Some(method.into());
        self
    }

    /// Sets, or disables with `None`, the directory-index filename to strip.
    pub fn with_directory_index(mut self, index: Option<&str>) -> Self {
        self.remove_directory_index = index.map(str::to_owned);
        self
    }

    pub(crate) fn directory_index(&self) -> Option<&str> {
        self.remove_directory_index.as_deref()
    }
}
