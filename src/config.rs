//! Configuration management for CrabTorch
//!
//! Selects the camera backend and describes the simulated camera layout used
//! for desktop development and the headless CLI.

use crate::controller::TorchController;
use crate::platform::{SimulatedCamera, SimulatedCameraService, SimulatedProvider, SystemProvider};
use crate::types::LensFacing;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable prefix for layered configuration (`CRABTORCH_BACKEND=simulated`).
pub const ENV_PREFIX: &str = "CRABTORCH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to load layered config: {0}")]
    Layered(#[from] ::config::ConfigError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorchConfig {
    pub backend: Backend,
    pub simulated: SimulatedConfig,
}

/// Which camera service the torch controller talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The operating system camera service
    #[default]
    System,
    /// In-memory cameras from the `simulated` section
    Simulated,
}

/// Simulated camera layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Platform offers a variable strength torch API
    pub supports_strength_control: bool,
    /// Every torch mutation reports the camera as in use
    pub busy: bool,
    /// Cameras in enumeration order
    pub cameras: Vec<SimulatedCamera>,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            supports_strength_control: true,
            busy: false,
            cameras: vec![
                SimulatedCamera::back_with_flash("0").with_max_strength_level(5),
                SimulatedCamera::new("1", false, LensFacing::Front),
            ],
        }
    }
}

impl Default for TorchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::System,
            simulated: SimulatedConfig::default(),
        }
    }
}

impl TorchConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: TorchConfig = toml::from_str(&contents)?;
        config.validate()?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load the TOML file (if any) with `CRABTORCH_*` environment overrides on top
    pub fn load_layered<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let layered = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: TorchConfig = layered.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabtorch.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_layered(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for camera in &self.simulated.cameras {
            if camera.id.is_empty() {
                return Err(ConfigError::Invalid("Camera id must not be empty".to_string()));
            }
            if !seen.insert(camera.id.as_str()) {
                return Err(ConfigError::Invalid(format!("Duplicate camera id: {}", camera.id)));
            }
            if camera.max_strength_level == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "Camera {}: max_strength_level must be at least 1",
                    camera.id
                )));
            }
        }
        Ok(())
    }

    /// Build a torch controller for the configured backend
    pub fn controller(&self) -> TorchController {
        match self.backend {
            Backend::System => TorchController::new(Arc::new(SystemProvider)),
            Backend::Simulated => {
                let service = SimulatedCameraService::new(self.simulated.cameras.clone())
                    .with_strength_control(self.simulated.supports_strength_control);
                service.set_busy(self.simulated.busy);
                TorchController::new(Arc::new(SimulatedProvider::new(Arc::new(service))))
            }
        }
    }
}
