use anyhow::{Context, Result};
use posture_risk::AssessmentConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the CLI keeps its configuration
///
/// An explicit path (flag or POSTURE_RISK_CONFIG) wins over
/// ~/.posture-risk/config.toml.
#[derive(Debug, Clone)]
pub struct ConfigLocation {
    path: PathBuf,
    explicit: bool,
}

impl ConfigLocation {
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Ok(Self {
                path,
                explicit: true,
            }),
            None => Ok(Self {
                path: Self::default_file()?,
                explicit: false,
            }),
        }
    }

    /// Get config directory path (~/.posture-risk/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".posture-risk"))
    }

    /// Get config file path (~/.posture-risk/config.toml)
    pub fn default_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file (or defaults when the default file is absent), then
    /// apply environment overrides
    pub fn load(&self) -> Result<AssessmentConfig> {
        let config = if self.path.exists() {
            AssessmentConfig::load(&self.path)?
        } else if self.explicit {
            anyhow::bail!("Config file not found: {}", self.path.display());
        } else {
            tracing::info!("Config file not found, using defaults");
            AssessmentConfig::default()
        };

        config.with_env_overrides()
    }

    /// Save configuration to file
    pub fn save(&self, config: &AssessmentConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&self.path, config.to_toml()?).context("Failed to write config file")?;

        Ok(())
    }
}
