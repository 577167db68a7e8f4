//! Platform camera backends
//!
//! The torch controller never talks to a camera API directly. It goes through
//! [`CameraServiceProvider`], which hands out a [`CameraService`] when the
//! platform camera service can be obtained.

use crate::errors::PlatformError;
use crate::types::CameraCharacteristics;
use std::sync::Arc;

#[cfg(target_os = "android")]
pub mod android;
pub mod simulated;

pub use simulated::{SimulatedCamera, SimulatedCameraService, SimulatedProvider, TorchCall};

/// Camera enumeration and torch mutation as exposed by the platform.
pub trait CameraService: Send + Sync {
    /// Camera ids in platform enumeration order.
    fn camera_ids(&self) -> Result<Vec<String>, PlatformError>;

    fn characteristics(&self, camera_id: &str) -> Result<CameraCharacteristics, PlatformError>;

    fn set_torch_mode(&self, camera_id: &str, enabled: bool) -> Result<(), PlatformError>;

    /// Turn the torch on at `level`, in `1..=max_strength_level`.
    fn set_torch_strength(&self, camera_id: &str, level: u32) -> Result<(), PlatformError>;

    /// Whether the platform has a variable strength torch API at all.
    fn supports_strength_control(&self) -> bool;
}

/// Hands out the platform camera service, if it can be obtained.
pub trait CameraServiceProvider: Send + Sync {
    fn camera_service(&self) -> Option<Arc<dyn CameraService>>;
}

impl<F> CameraServiceProvider for F
where
    F: Fn() -> Option<Arc<dyn CameraService>> + Send + Sync,
{
    fn camera_service(&self) -> Option<Arc<dyn CameraService>> {
        self()
    }
}

/// The camera service of the operating system the crate runs on.
///
/// Only Android has a torch backend; elsewhere the service is unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProvider;

impl CameraServiceProvider for SystemProvider {
    #[cfg(target_os = "android")]
    fn camera_service(&self) -> Option<Arc<dyn CameraService>> {
        match android::AndroidCameraService::new() {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                log::error!("Failed to obtain CameraManager: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_os = "android"))]
    fn camera_service(&self) -> Option<Arc<dyn CameraService>> {
        log::debug!(
            "No torch backend for platform {}",
            crate::types::Platform::current().as_str()
        );
        None
    }
}
