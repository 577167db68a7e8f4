//! Torch commands exposed to the Tauri host
//!
//! Each command builds a controller from the active configuration and runs
//! it on the blocking pool, since platform camera calls block. The
//! `dispatch_*` functions take the controller explicitly and carry the actual
//! command behaviour.

use super::config::current_controller;
use crate::controller::TorchController;
use crate::errors::TorchError;
use crate::types::{BrightnessLevel, TorchCapabilities, OFF, ON};
use serde::Serialize;
use tauri::command;

/// State names a host should pass to `set_state_async`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorchConstants {
    #[serde(rename = "ON")]
    pub on: &'static str,
    #[serde(rename = "OFF")]
    pub off: &'static str,
}

impl Default for TorchConstants {
    fn default() -> Self {
        Self { on: ON, off: OFF }
    }
}

async fn run_blocking<T, F>(controller: TorchController, f: F) -> Result<T, TorchError>
where
    T: Send + 'static,
    F: FnOnce(&TorchController) -> Result<T, TorchError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&controller))
        .await
        .map_err(|e| TorchError::TorchFailure(format!("Torch task failed: {}", e)))?
}

fn controller() -> Result<TorchController, TorchError> {
    current_controller().map_err(TorchError::TorchFailure)
}

pub async fn dispatch_is_torch_available(controller: TorchController) -> bool {
    match run_blocking(controller, |c| Ok(c.is_torch_available())).await {
        Ok(available) => available,
        Err(e) => {
            log::error!("Failed to query torch availability: {}", e);
            false
        }
    }
}

pub async fn dispatch_is_brightness_controllable(controller: TorchController) -> bool {
    match run_blocking(controller, |c| Ok(c.is_brightness_controllable())).await {
        Ok(controllable) => controllable,
        Err(e) => {
            log::error!("Failed to query brightness control: {}", e);
            false
        }
    }
}

pub async fn dispatch_capabilities(controller: TorchController) -> Result<TorchCapabilities, TorchError> {
    run_blocking(controller, |c| Ok(c.capabilities())).await
}

pub async fn dispatch_set_state(controller: TorchController, state: String) -> Result<(), TorchError> {
    let result = run_blocking(controller, move |c| c.set_state_str(&state)).await;
    if let Err(e) = &result {
        log::warn!("set_state_async rejected with {}: {}", e.code(), e);
    }
    result
}

/// Rejects levels outside `[0, 1]` before the controller is ever invoked.
pub async fn dispatch_set_brightness(controller: TorchController, level: f64) -> Result<(), TorchError> {
    let level = BrightnessLevel::new(level)?;
    let result = run_blocking(controller, move |c| c.set_brightness(level)).await;
    if let Err(e) = &result {
        log::warn!("set_brightness_async rejected with {}: {}", e.code(), e);
    }
    result
}

/// Whether a back-facing camera with a flash unit is present
#[command]
pub async fn is_torch_available() -> bool {
    match controller() {
        Ok(controller) => dispatch_is_torch_available(controller).await,
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}

/// Whether the torch supports more than one brightness level
#[command]
pub async fn is_brightness_controllable() -> bool {
    match controller() {
        Ok(controller) => dispatch_is_brightness_controllable(controller).await,
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}

/// Turn the torch "ON" or "OFF"
#[command]
pub async fn set_state_async(state: String) -> Result<(), TorchError> {
    log::info!("Setting torch state: {}", state);
    dispatch_set_state(controller()?, state).await
}

/// Set torch brightness, 0.0 (off) to 1.0 (maximum)
#[command]
pub async fn set_brightness_async(level: f64) -> Result<(), TorchError> {
    log::info!("Setting torch brightness: {}", level);
    BrightnessLevel::new(level)?;
    dispatch_set_brightness(controller()?, level).await
}

#[command]
pub async fn get_torch_capabilities() -> Result<TorchCapabilities, TorchError> {
    dispatch_capabilities(controller()?).await
}

#[command]
pub fn get_torch_constants() -> TorchConstants {
    TorchConstants::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        let json = serde_json::to_value(get_torch_constants()).unwrap();
        assert_eq!(json["ON"], "ON");
        assert_eq!(json["OFF"], "OFF");
    }

    #[tokio::test]
    async fn test_out_of_range_brightness_rejected_locally() {
        let err = set_brightness_async(1.5).await.unwrap_err();
        assert_eq!(err.code(), crate::errors::ErrorCode::InvalidBrightness);

        let err = set_brightness_async(-0.1).await.unwrap_err();
        assert_eq!(err, TorchError::InvalidBrightness(-0.1));
    }
}
