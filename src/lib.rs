//! CrabTorch: camera flashlight (torch) control for Tauri applications
//!
//! Finds the back-facing camera with a flash unit and switches its torch on,
//! off, or to a brightness level where the platform supports strength levels.
//!
//! # Features
//! - Torch availability and brightness capability queries
//! - On/off control with a fixed error taxonomy (`E_CAMERA_IN_USE`, ...)
//! - Brightness fractions mapped onto the device's strength levels
//! - Android backend over `CameraManager`, simulated backend everywhere else
//!
//! # Usage
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(crabtorch::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Without Tauri, drive a [`TorchController`] directly:
//! ```rust,ignore
//! let torch = crabtorch::TorchController::system();
//! if torch.is_torch_available() {
//!     torch.set_brightness(crabtorch::BrightnessLevel::new(0.5)?)?;
//! }
//! ```
pub mod commands;
pub mod config;
pub mod controller;
pub mod errors;
pub mod platform;
pub mod selector;
pub mod types;

// Testing utilities - simulated camera layouts for offline testing
pub mod testing;

// Re-exports for convenience
pub use crate::config::TorchConfig;
pub use crate::controller::TorchController;
pub use crate::errors::{ErrorCode, PlatformError, TorchError};
pub use crate::platform::{CameraService, CameraServiceProvider, SystemProvider};
pub use crate::selector::find_torch_camera;
pub use crate::types::{
    BrightnessLevel, CameraCharacteristics, CameraHandle, LensFacing, Platform, TorchCapabilities,
    TorchRequest, TorchState, OFF, ON,
};

use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the CrabTorch plugin with all commands
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    log::info!(
        "Initializing CrabTorch plugin on {}",
        Platform::current().as_str()
    );

    Builder::new("crabtorch")
        .invoke_handler(tauri::generate_handler![
            commands::torch::is_torch_available,
            commands::torch::is_brightness_controllable,
            commands::torch::set_state_async,
            commands::torch::set_brightness_async,
            commands::torch::get_torch_capabilities,
            commands::torch::get_torch_constants,
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
        ])
        .build()
}

/// Initialize logging for the torch plugin
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "crabtorch=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        platform: Platform::current(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: Platform,
}
