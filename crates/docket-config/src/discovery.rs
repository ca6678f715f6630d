//! File-based config discovery
//!
//! Finds `docket.toml` and layers it between the built-in defaults and
//! `DOCKET_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};

use crate::config::DocketConfig;
use crate::error::{ConfigError, Result};

/// Conventional config file name.
pub const CONFIG_FILE: &str = "docket.toml";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use docket_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of `docket.toml` in the root directory, if present.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE);
        path.is_file().then_some(path)
    }

    /// Load the discovered config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<DocketConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load the discovered config file, or defaults plus environment when
    /// there is none.
    pub fn load_or_default(&self) -> Result<DocketConfig> {
        match self.find() {
            Some(path) => self.load_from(&path),
            None => {
                tracing::debug!(root = %self.root.display(), "no config file, using defaults");
                self.extract(base_figment().merge(env()))
            }
        }
    }

    /// Load a specific config file. Relative inputs are resolved against
    /// the discovery root.
    pub fn load_from(&self, path: &Path) -> Result<DocketConfig> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if !is_toml {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(ConfigError::NotFound);
        }

        tracing::debug!(path = %path.display(), "loading config");
        self.extract(base_figment().merge(Toml::file(path)).merge(env()))
    }

    fn extract(&self, figment: Figment) -> Result<DocketConfig> {
        let mut config: DocketConfig = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: e.to_string(),
        })?;
        config.validate()?;

        for input in &mut config.inputs {
            if input.is_relative() {
                *input = self.root.join(&*input);
            }
        }
        Ok(config)
    }
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(DocketConfig::default()))
}

/// `DOCKET_CHECK_TYPES=true` sets `check_types`.
fn env() -> Env {
    Env::prefixed("DOCKET_")
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<DocketConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_or_default()
}
