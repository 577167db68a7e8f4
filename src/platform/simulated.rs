//! In-memory camera registry
//!
//! Behaves like a phone camera service: cameras are enumerated in the
//! configured order, the torch remembers its own state, and faults (busy
//! device, unreadable characteristics, failing mutations) can be switched on.
//! Every torch mutation the service receives is recorded in a call log.

use super::{CameraService, CameraServiceProvider};
use crate::errors::PlatformError;
use crate::types::{CameraCharacteristics, LensFacing};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// One simulated camera device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedCamera {
    pub id: String,
    #[serde(default)]
    pub has_flash: bool,
    #[serde(default)]
    pub facing: LensFacing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_strength_level: Option<u32>,
    /// Reading this camera's characteristics fails with an access error.
    #[serde(default)]
    pub unreadable: bool,
}

impl SimulatedCamera {
    pub fn new(id: impl Into<String>, has_flash: bool, facing: LensFacing) -> Self {
        Self {
            id: id.into(),
            has_flash,
            facing,
            max_strength_level: None,
            unreadable: false,
        }
    }

    /// Rear camera with flash hardware.
    pub fn back_with_flash(id: impl Into<String>) -> Self {
        Self::new(id, true, LensFacing::Back)
    }

    pub fn front(id: impl Into<String>) -> Self {
        Self::new(id, false, LensFacing::Front)
    }

    pub fn with_max_strength_level(mut self, level: u32) -> Self {
        self.max_strength_level = Some(level);
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    fn characteristics(&self) -> CameraCharacteristics {
        CameraCharacteristics {
            has_flash: self.has_flash,
            facing: self.facing,
            max_strength_level: self.max_strength_level,
        }
    }
}

/// A torch mutation received by the simulated service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorchCall {
    Mode { camera_id: String, enabled: bool },
    Strength { camera_id: String, level: u32 },
}

#[derive(Debug, Default)]
struct TorchHardware {
    camera_id: Option<String>,
    strength: Option<u32>,
}

#[derive(Debug)]
pub struct SimulatedCameraService {
    cameras: Vec<SimulatedCamera>,
    supports_strength_control: bool,
    busy: AtomicBool,
    enumeration_fails: AtomicBool,
    failure: Mutex<Option<String>>,
    hardware: Mutex<TorchHardware>,
    calls: Mutex<Vec<TorchCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulatedCameraService {
    pub fn new(cameras: Vec<SimulatedCamera>) -> Self {
        Self {
            cameras,
            supports_strength_control: true,
            busy: AtomicBool::new(false),
            enumeration_fails: AtomicBool::new(false),
            failure: Mutex::new(None),
            hardware: Mutex::new(TorchHardware::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_strength_control(mut self, supported: bool) -> Self {
        self.supports_strength_control = supported;
        self
    }

    pub fn cameras(&self) -> &[SimulatedCamera] {
        &self.cameras
    }

    /// Make every torch mutation fail as if another app held the camera.
    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    /// Make every torch mutation fail with `message`.
    pub fn set_failure(&self, message: Option<String>) {
        *lock(&self.failure) = message;
    }

    /// Make listing camera ids fail.
    pub fn set_enumeration_failure(&self, fails: bool) {
        self.enumeration_fails.store(fails, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TorchCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    pub fn is_torch_on(&self) -> bool {
        lock(&self.hardware).camera_id.is_some()
    }

    /// Current strength; `None` while off or when lit through the binary API.
    pub fn strength_level(&self) -> Option<u32> {
        lock(&self.hardware).strength
    }

    fn camera(&self, camera_id: &str) -> Result<&SimulatedCamera, PlatformError> {
        self.cameras
            .iter()
            .find(|c| c.id == camera_id)
            .ok_or_else(|| PlatformError::Other(format!("Unknown camera id: {}", camera_id)))
    }

    fn check_mutation(&self, camera: &SimulatedCamera) -> Result<(), PlatformError> {
        if self.busy.load(Ordering::SeqCst) {
            return Err(PlatformError::DeviceBusy(format!(
                "Camera {} is in use by another application",
                camera.id
            )));
        }
        if let Some(message) = lock(&self.failure).clone() {
            return Err(PlatformError::Other(message));
        }
        if !camera.has_flash {
            return Err(PlatformError::Other(format!(
                "Camera {} has no flash unit",
                camera.id
            )));
        }
        Ok(())
    }
}

impl CameraService for SimulatedCameraService {
    fn camera_ids(&self) -> Result<Vec<String>, PlatformError> {
        if self.enumeration_fails.load(Ordering::SeqCst) {
            return Err(PlatformError::Access("camera service disconnected".to_string()));
        }
        Ok(self.cameras.iter().map(|c| c.id.clone()).collect())
    }

    fn characteristics(&self, camera_id: &str) -> Result<CameraCharacteristics, PlatformError> {
        let camera = self.camera(camera_id)?;
        if camera.unreadable {
            return Err(PlatformError::Access(format!(
                "Cannot read characteristics of camera {}",
                camera_id
            )));
        }
        Ok(camera.characteristics())
    }

    fn set_torch_mode(&self, camera_id: &str, enabled: bool) -> Result<(), PlatformError> {
        lock(&self.calls).push(TorchCall::Mode {
            camera_id: camera_id.to_string(),
            enabled,
        });

        let camera = self.camera(camera_id)?;
        self.check_mutation(camera)?;

        let mut hardware = lock(&self.hardware);
        hardware.camera_id = enabled.then(|| camera_id.to_string());
        hardware.strength = None;
        Ok(())
    }

    fn set_torch_strength(&self, camera_id: &str, level: u32) -> Result<(), PlatformError> {
        lock(&self.calls).push(TorchCall::Strength {
            camera_id: camera_id.to_string(),
            level,
        });

        if !self.supports_strength_control {
            return Err(PlatformError::Other(
                "Torch strength control is not supported".to_string(),
            ));
        }

        let camera = self.camera(camera_id)?;
        self.check_mutation(camera)?;

        let max = camera.max_strength_level.unwrap_or(1);
        if level == 0 || level > max {
            return Err(PlatformError::Other(format!(
                "Strength level {} outside 1..={}",
                level, max
            )));
        }

        let mut hardware = lock(&self.hardware);
        hardware.camera_id = Some(camera_id.to_string());
        hardware.strength = Some(level);
        Ok(())
    }

    fn supports_strength_control(&self) -> bool {
        self.supports_strength_control
    }
}

/// Provider over a shared simulated service.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProvider {
    service: Option<Arc<SimulatedCameraService>>,
}

impl SimulatedProvider {
    pub fn new(service: Arc<SimulatedCameraService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// A provider whose camera service can never be obtained.
    pub fn unavailable() -> Self {
        Self { service: None }
    }
}

impl CameraServiceProvider for SimulatedProvider {
    fn camera_service(&self) -> Option<Arc<dyn CameraService>> {
        self.service
            .as_ref()
            .map(|service| Arc::clone(service) as Arc<dyn CameraService>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SimulatedCameraService {
        SimulatedCameraService::new(vec![
            SimulatedCamera::back_with_flash("0").with_max_strength_level(5),
            SimulatedCamera::front("1"),
        ])
    }

    #[test]
    fn test_enumeration_order_preserved() {
        assert_eq!(service().camera_ids().unwrap(), vec!["0", "1"]);
    }

    #[test]
    fn test_torch_state_follows_mutations() {
        let service = service();
        service.set_torch_strength("0", 4).unwrap();
        assert!(service.is_torch_on());
        assert_eq!(service.strength_level(), Some(4));

        service.set_torch_mode("0", false).unwrap();
        assert!(!service.is_torch_on());
        assert_eq!(service.strength_level(), None);
        assert_eq!(service.calls().len(), 2);
    }

    #[test]
    fn test_busy_device() {
        let service = service();
        service.set_busy(true);
        let err = service.set_torch_mode("0", true).unwrap_err();
        assert!(matches!(err, PlatformError::DeviceBusy(_)));
        assert!(!service.is_torch_on());
    }

    #[test]
    fn test_strength_out_of_range_rejected() {
        let service = service();
        assert!(service.set_torch_strength("0", 6).is_err());
        assert!(service.set_torch_strength("0", 0).is_err());
    }

    #[test]
    fn test_unavailable_provider() {
        assert!(SimulatedProvider::unavailable().camera_service().is_none());
    }
}
