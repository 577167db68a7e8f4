use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Errors reported to callers of the torch operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TorchError {
    #[error("Camera service is not available.")]
    CameraManagerUnavailable,
    #[error("Invalid state: {0}. Use 'ON' or 'OFF'.")]
    InvalidState(String),
    #[error("Torch is not available on this device.")]
    TorchUnavailable,
    #[error("Torch is not available because the camera is in use.")]
    CameraInUse,
    #[error("Failed to set torch state: {0}")]
    TorchFailure(String),
    #[error("Brightness level must be between 0 and 1")]
    InvalidBrightness(f64),
}

/// Machine-readable error kind, stable across the host bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CameraManagerUnavailable,
    InvalidState,
    TorchUnavailable,
    CameraInUse,
    TorchFailure,
    InvalidBrightness,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CameraManagerUnavailable => "E_CAMERA_MANAGER_UNAVAILABLE",
            ErrorCode::InvalidState => "E_INVALID_STATE",
            ErrorCode::TorchUnavailable => "E_TORCH_UNAVAILABLE",
            ErrorCode::CameraInUse => "E_CAMERA_IN_USE",
            ErrorCode::TorchFailure => "E_TORCH_FAILURE",
            ErrorCode::InvalidBrightness => "E_INVALID_BRIGHTNESS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TorchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TorchError::CameraManagerUnavailable => ErrorCode::CameraManagerUnavailable,
            TorchError::InvalidState(_) => ErrorCode::InvalidState,
            TorchError::TorchUnavailable => ErrorCode::TorchUnavailable,
            TorchError::CameraInUse => ErrorCode::CameraInUse,
            TorchError::TorchFailure(_) => ErrorCode::TorchFailure,
            TorchError::InvalidBrightness(_) => ErrorCode::InvalidBrightness,
        }
    }

    /// Whether the caller may succeed by retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TorchError::CameraInUse)
    }
}

impl From<PlatformError> for TorchError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::DeviceBusy(_) => TorchError::CameraInUse,
            PlatformError::Access(msg) | PlatformError::Other(msg) => TorchError::TorchFailure(msg),
        }
    }
}

// Tauri rejects commands with whatever the error serializes to, so the host
// side receives `{ code, message }` rather than a bare string.
impl Serialize for TorchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TorchError", 2)?;
        state.serialize_field("code", self.code().as_str())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Failures raised by a platform camera backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Another process holds the camera.
    #[error("camera device busy: {0}")]
    DeviceBusy(String),
    #[error("camera access error: {0}")]
    Access(String),
    #[error("{0}")]
    Other(String),
}
