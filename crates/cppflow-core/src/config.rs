use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::catalog::NamingConvention;
use crate::constants::*;
use crate::error::{FlowError, Result};

/// Configuration loaded from `cppflow.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

impl FlowConfig {
    /// Loads the config at `path`, falling back to defaults when the file does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("config '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| FlowError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(path, &text)
    }

    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        let cfg = toml::from_str::<Self>(text).map_err(|e| FlowError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate().map_err(|message| FlowError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(cfg)
    }

    /// The build directory is wiped on every run, so it must be a plain
    /// relative path below the project root that does not hold the tests.
    fn validate(&self) -> std::result::Result<(), String> {
        let build_dir = &self.project.build_dir;
        let plain = build_dir
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if build_dir.as_os_str().is_empty() || !plain {
            return Err(format!(
                "project.build_dir '{}' must be a relative path below the project root \
                 without '.' or '..' components",
                build_dir.display()
            ));
        }

        let test_dir: PathBuf = self
            .project
            .test_dir
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if test_dir.starts_with(build_dir) {
            return Err(format!(
                "project.test_dir '{}' must not be inside project.build_dir '{}'",
                self.project.test_dir.display(),
                build_dir.display()
            ));
        }

        if self.naming.extension.is_empty() {
            return Err("naming.extension must not be empty".to_string());
        }

        Ok(())
    }

    pub fn naming_convention(&self) -> NamingConvention {
        NamingConvention::new(&self.naming.extension, &self.naming.suffix)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub test_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            test_dir: PathBuf::from(DEFAULT_TEST_DIR),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }
}

impl ProjectConfig {
    pub fn test_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.test_dir)
    }

    pub fn build_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.build_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub extension: String,
    pub suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            suffix: DEFAULT_TARGET_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    pub configure: String,
    pub build: String,
    pub test: String,
    /// Passed as `--config <value>` to the build step. Empty disables it,
    /// for single-configuration generators.
    pub build_config: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            configure: DEFAULT_CONFIGURE_PROGRAM.to_string(),
            build: DEFAULT_BUILD_PROGRAM.to_string(),
            test: DEFAULT_TEST_PROGRAM.to_string(),
            build_config: DEFAULT_BUILD_CONFIG.to_string(),
        }
    }
}

impl ToolchainConfig {
    pub fn build_config(&self) -> Option<&str> {
        let value = self.build_config.trim();
        (!value.is_empty()).then_some(value)
    }
}
