//! Torch camera discovery
//!
//! Picks the first enumerated camera that has a flash unit and faces away
//! from the user. Enumeration order is whatever the platform reports; there
//! is no ranking beyond first match.

use crate::platform::CameraService;
use crate::types::CameraHandle;

/// Find the camera to use for torch control.
///
/// Cameras whose characteristics cannot be read are skipped. Returns `None`
/// when nothing matches or the camera list itself cannot be read.
pub fn find_torch_camera(service: &dyn CameraService) -> Option<CameraHandle> {
    let camera_ids = match service.camera_ids() {
        Ok(ids) => ids,
        Err(e) => {
            log::warn!("Failed to list cameras: {}", e);
            return None;
        }
    };

    for camera_id in camera_ids {
        let characteristics = match service.characteristics(&camera_id) {
            Ok(characteristics) => characteristics,
            Err(e) => {
                log::warn!("Skipping camera {}: {}", camera_id, e);
                continue;
            }
        };

        if characteristics.is_torch_capable() {
            log::debug!(
                "Selected camera {} for torch (max strength: {:?})",
                camera_id,
                characteristics.max_strength_level
            );
            return Some(CameraHandle::new(camera_id, characteristics));
        }
    }

    log::debug!("No back-facing camera with flash found");
    None
}
