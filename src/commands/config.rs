use crate::config::TorchConfig;
use crate::controller::TorchController;
use std::sync::{Arc, RwLock};
use tauri::command;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: Arc<RwLock<TorchConfig>> = Arc::new(RwLock::new(TorchConfig::load_or_default()));
}

/// Controller for the active configuration
pub(crate) fn current_controller() -> Result<TorchController, String> {
    let config = GLOBAL_CONFIG.read().map_err(|e| e.to_string())?;
    Ok(config.controller())
}

/// Get the current configuration
#[command]
pub async fn get_config() -> Result<TorchConfig, String> {
    let config = GLOBAL_CONFIG.read().map_err(|e| e.to_string())?;
    Ok(config.clone())
}

/// Update configuration
#[command]
pub async fn update_config(new_config: TorchConfig) -> Result<(), String> {
    new_config.validate().map_err(|e| e.to_string())?;

    {
        let mut config = GLOBAL_CONFIG.write().map_err(|e| e.to_string())?;
        *config = new_config.clone();
    }
    log::info!("Torch backend set to {:?}", new_config.backend);

    new_config
        .save_to_file(TorchConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Reset configuration to defaults
#[command]
pub async fn reset_config() -> Result<TorchConfig, String> {
    let default_config = TorchConfig::default();

    {
        let mut config = GLOBAL_CONFIG
            .write()
            .map_err(|e| format!("Failed to write config: {}", e))?;
        *config = default_config.clone();
    }

    default_config
        .save_to_file(TorchConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(default_config)
}
