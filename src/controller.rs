//! Torch controller
//!
//! Every call obtains the camera service, rediscovers the torch camera and
//! applies the request. Nothing is cached between calls: the torch state lives
//! in the platform driver, and a camera that was free a moment ago may be busy
//! now.

use crate::errors::TorchError;
use crate::platform::{CameraService, CameraServiceProvider, SystemProvider};
use crate::selector::find_torch_camera;
use crate::types::{BrightnessLevel, CameraHandle, TorchCapabilities, TorchRequest, TorchState};
use std::sync::Arc;

pub struct TorchController {
    provider: Arc<dyn CameraServiceProvider>,
}

impl TorchController {
    pub fn new(provider: Arc<dyn CameraServiceProvider>) -> Self {
        Self { provider }
    }

    /// Controller over the operating system's camera service.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemProvider))
    }

    fn camera_service(&self) -> Result<Arc<dyn CameraService>, TorchError> {
        self.provider
            .camera_service()
            .ok_or(TorchError::CameraManagerUnavailable)
    }

    fn torch_camera(service: &dyn CameraService) -> Result<CameraHandle, TorchError> {
        find_torch_camera(service).ok_or(TorchError::TorchUnavailable)
    }

    pub fn is_torch_available(&self) -> bool {
        self.provider
            .camera_service()
            .is_some_and(|service| find_torch_camera(service.as_ref()).is_some())
    }

    /// True when the torch can be dimmed to more than one non-zero level.
    pub fn is_brightness_controllable(&self) -> bool {
        let Some(service) = self.provider.camera_service() else {
            return false;
        };
        if !service.supports_strength_control() {
            return false;
        }
        find_torch_camera(service.as_ref())
            .and_then(|camera| camera.max_strength_level)
            .is_some_and(|max| max > 1)
    }

    pub fn capabilities(&self) -> TorchCapabilities {
        let Some(service) = self.provider.camera_service() else {
            return TorchCapabilities::default();
        };
        let Some(camera) = find_torch_camera(service.as_ref()) else {
            return TorchCapabilities::default();
        };

        let brightness_controllable = service.supports_strength_control()
            && camera.max_strength_level.is_some_and(|max| max > 1);

        TorchCapabilities {
            torch_available: true,
            brightness_controllable,
            camera_id: Some(camera.id),
            max_strength_level: camera.max_strength_level,
        }
    }

    pub fn set_state(&self, state: TorchState) -> Result<(), TorchError> {
        let service = self.camera_service()?;
        self.apply_state(service.as_ref(), state)
    }

    /// Like [`set_state`](Self::set_state), taking the state as the host sent it.
    pub fn set_state_str(&self, state: &str) -> Result<(), TorchError> {
        let service = self.camera_service()?;
        let state = state.parse::<TorchState>()?;
        self.apply_state(service.as_ref(), state)
    }

    fn apply_state(&self, service: &dyn CameraService, state: TorchState) -> Result<(), TorchError> {
        let camera = Self::torch_camera(service)?;

        log::debug!("Setting torch {} on camera {}", state, camera.id);
        service
            .set_torch_mode(&camera.id, state.is_on())
            .map_err(|e| mutation_failed(&camera, e))
    }

    pub fn set_brightness(&self, level: BrightnessLevel) -> Result<(), TorchError> {
        let service = self.camera_service()?;
        let camera = Self::torch_camera(service.as_ref())?;

        let result = if level.value() <= 0.0 {
            log::debug!("Brightness 0, turning torch off on camera {}", camera.id);
            service.set_torch_mode(&camera.id, false)
        } else {
            match camera.max_strength_level {
                Some(max) if service.supports_strength_control() => {
                    let strength = level.to_strength(max);
                    log::debug!(
                        "Setting torch strength {}/{} on camera {}",
                        strength,
                        max,
                        camera.id
                    );
                    service.set_torch_strength(&camera.id, strength)
                }
                _ => {
                    log::debug!("No strength control, turning torch on at camera {}", camera.id);
                    service.set_torch_mode(&camera.id, true)
                }
            }
        };

        result.map_err(|e| mutation_failed(&camera, e))
    }

    pub fn apply(&self, request: TorchRequest) -> Result<(), TorchError> {
        match request {
            TorchRequest::State(state) => self.set_state(state),
            TorchRequest::Brightness(level) => self.set_brightness(level),
        }
    }
}

impl Default for TorchController {
    fn default() -> Self {
        Self::system()
    }
}

fn mutation_failed(camera: &CameraHandle, error: crate::errors::PlatformError) -> TorchError {
    let error = TorchError::from(error);
    match &error {
        TorchError::CameraInUse => {
            log::error!("Torch is not available because camera {} is in use.", camera.id)
        }
        _ => log::error!("Torch mutation on camera {} failed: {}", camera.id, error),
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{SimulatedCamera, SimulatedCameraService, SimulatedProvider, TorchCall};

    fn controller(service: SimulatedCameraService) -> (TorchController, Arc<SimulatedCameraService>) {
        let service = Arc::new(service);
        let controller = TorchController::new(Arc::new(SimulatedProvider::new(service.clone())));
        (controller, service)
    }

    fn phone() -> SimulatedCameraService {
        SimulatedCameraService::new(vec![
            SimulatedCamera::back_with_flash("0").with_max_strength_level(5),
            SimulatedCamera::front("1"),
        ])
    }

    #[test]
    fn test_set_state_on_and_off() {
        let (controller, service) = controller(phone());

        controller.set_state(TorchState::On).unwrap();
        assert!(service.is_torch_on());
        controller.set_state(TorchState::Off).unwrap();
        assert!(!service.is_torch_on());
    }

    #[test]
    fn test_invalid_state_issues_no_mutation() {
        let (controller, service) = controller(phone());

        let err = controller.set_state_str("BLINK").unwrap_err();
        assert_eq!(err, TorchError::InvalidState("BLINK".to_string()));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_service_checked_before_state() {
        let controller = TorchController::new(Arc::new(SimulatedProvider::unavailable()));
        assert_eq!(
            controller.set_state_str("BLINK").unwrap_err(),
            TorchError::CameraManagerUnavailable
        );
    }

    #[test]
    fn test_brightness_mid_level() {
        let (controller, service) = controller(phone());

        controller.set_brightness(BrightnessLevel::new(0.5).unwrap()).unwrap();
        assert_eq!(
            service.calls(),
            vec![TorchCall::Strength {
                camera_id: "0".to_string(),
                level: 3
            }]
        );
    }

    #[test]
    fn test_brightness_without_max_level_falls_back_to_binary() {
        let (controller, service) = controller(SimulatedCameraService::new(vec![
            SimulatedCamera::back_with_flash("0"),
        ]));

        controller.set_brightness(BrightnessLevel::new(0.7).unwrap()).unwrap();
        assert_eq!(
            service.calls(),
            vec![TorchCall::Mode {
                camera_id: "0".to_string(),
                enabled: true
            }]
        );
    }

    #[test]
    fn test_other_failure_carries_message() {
        let (controller, service) = controller(phone());
        service.set_failure(Some("camera disabled by policy".to_string()));

        let err = controller.set_state(TorchState::On).unwrap_err();
        assert_eq!(err, TorchError::TorchFailure("camera disabled by policy".to_string()));
    }

    #[test]
    fn test_capabilities() {
        let (controller, _service) = controller(phone());
        let caps = controller.capabilities();
        assert!(caps.torch_available);
        assert!(caps.brightness_controllable);
        assert_eq!(caps.camera_id.as_deref(), Some("0"));
        assert_eq!(caps.max_strength_level, Some(5));
    }

    #[test]
    fn test_apply_dispatches_request() {
        let (controller, service) = controller(phone());
        controller.apply(TorchRequest::from(BrightnessLevel::MAX)).unwrap();
        assert_eq!(service.strength_level(), Some(5));
        controller.apply(TorchRequest::from(TorchState::Off)).unwrap();
        assert!(!service.is_torch_on());
    }
}
