//! Runtime settings resolved from the product config and the environment

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Package manager used when no override is set
pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

/// Install timeout used when no override is set
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for a scaffold run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Program invoked to fetch packages
    pub package_manager: String,
    /// Upper bound for a single package manager invocation
    pub install_timeout: Duration,
    /// Custom entry-file template replacing the bundled one
    pub template_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            install_timeout: DEFAULT_INSTALL_TIMEOUT,
            template_path: None,
        }
    }
}

impl Settings {
    /// Read overrides from the environment variables named by the product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Same as `from_config` with an injectable variable lookup
    pub fn from_lookup<C, F>(config: &C, lookup: F) -> Result<Self>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(program) = lookup(config.package_manager_env()) {
            if !program.trim().is_empty() {
                settings.package_manager = program.trim().to_string();
            }
        }

        if let Some(secs) = lookup(config.install_timeout_env()) {
            let secs: u64 = secs.trim().parse().with_context(|| {
                format!(
                    "Invalid {} value '{}': expected a number of seconds",
                    config.install_timeout_env(),
                    secs
                )
            })?;
            if secs == 0 {
                anyhow::bail!(
                    "Invalid {} value '0': the timeout must be at least one second",
                    config.install_timeout_env()
                );
            }
            settings.install_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup(config.template_env()) {
            if !path.trim().is_empty() {
                settings.template_path = Some(PathBuf::from(path.trim()));
            }
        }

        Ok(settings)
    }
}
