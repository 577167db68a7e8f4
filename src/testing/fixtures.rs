use crate::controller::TorchController;
use crate::platform::{SimulatedCamera, SimulatedCameraService, SimulatedProvider};
use crate::types::LensFacing;
use std::sync::Arc;

/// Back camera "0" with a five-level torch, front camera "1" without flash.
pub fn phone_with_dimmable_torch() -> SimulatedCameraService {
    SimulatedCameraService::new(vec![
        SimulatedCamera::back_with_flash("0").with_max_strength_level(5),
        SimulatedCamera::front("1"),
    ])
}

/// Same cameras on a platform release without the strength API.
pub fn phone_with_fixed_torch() -> SimulatedCameraService {
    SimulatedCameraService::new(vec![
        SimulatedCamera::back_with_flash("0").with_max_strength_level(5),
        SimulatedCamera::front("1"),
    ])
    .with_strength_control(false)
}

/// Strength API present, but the flash unit only has one level.
pub fn single_level_torch() -> SimulatedCameraService {
    SimulatedCameraService::new(vec![
        SimulatedCamera::back_with_flash("0").with_max_strength_level(1),
    ])
}

/// Camera "0" cannot be inspected; camera "1" is a usable back camera.
pub fn unreadable_first_camera() -> SimulatedCameraService {
    SimulatedCameraService::new(vec![
        SimulatedCamera::back_with_flash("0").unreadable(),
        SimulatedCamera::back_with_flash("1").with_max_strength_level(5),
    ])
}

/// Flash-equipped cameras, none of them facing back (tablet with a USB camera).
pub fn external_only() -> SimulatedCameraService {
    SimulatedCameraService::new(vec![
        SimulatedCamera::new("0", true, LensFacing::Front),
        SimulatedCamera::new("1", true, LensFacing::External),
    ])
}

/// Wrap a simulated service in a controller, keeping a handle for inspection.
pub fn simulated_controller(
    service: SimulatedCameraService,
) -> (TorchController, Arc<SimulatedCameraService>) {
    let service = Arc::new(service);
    let controller = TorchController::new(Arc::new(SimulatedProvider::new(Arc::clone(&service))));
    (controller, service)
}
