use crate::errors::TorchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host-facing name of the "on" torch state.
pub const ON: &str = "ON";
/// Host-facing name of the "off" torch state.
pub const OFF: &str = "OFF";

/// Direction a camera lens points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    Front,
    Back,
    External,
    #[default]
    Unknown,
}

impl LensFacing {
    /// Map the platform's integer lens-facing constant.
    pub fn from_platform(value: i32) -> Self {
        match value {
            0 => LensFacing::Front,
            1 => LensFacing::Back,
            2 => LensFacing::External,
            _ => LensFacing::Unknown,
        }
    }
}

/// Capability snapshot the platform reports for one camera id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraCharacteristics {
    pub has_flash: bool,
    pub facing: LensFacing,
    /// Highest torch strength level, when the platform reports one.
    pub max_strength_level: Option<u32>,
}

impl CameraCharacteristics {
    pub fn new(has_flash: bool, facing: LensFacing) -> Self {
        Self {
            has_flash,
            facing,
            max_strength_level: None,
        }
    }

    pub fn with_max_strength_level(mut self, level: u32) -> Self {
        self.max_strength_level = Some(level);
        self
    }

    /// A rear camera with flash hardware.
    pub fn is_torch_capable(&self) -> bool {
        self.has_flash && self.facing == LensFacing::Back
    }
}

/// The camera chosen for torch control during a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraHandle {
    pub id: String,
    pub has_flash: bool,
    pub facing: LensFacing,
    pub max_strength_level: Option<u32>,
}

impl CameraHandle {
    pub fn new(id: impl Into<String>, characteristics: CameraCharacteristics) -> Self {
        Self {
            id: id.into(),
            has_flash: characteristics.has_flash,
            facing: characteristics.facing,
            max_strength_level: characteristics.max_strength_level,
        }
    }
}

/// Binary torch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TorchState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl TorchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TorchState::On => ON,
            TorchState::Off => OFF,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, TorchState::On)
    }
}

impl From<bool> for TorchState {
    fn from(on: bool) -> Self {
        if on {
            TorchState::On
        } else {
            TorchState::Off
        }
    }
}

impl fmt::Display for TorchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TorchState {
    type Err = TorchError;

    /// Only the exact strings `"ON"` and `"OFF"` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ON => Ok(TorchState::On),
            OFF => Ok(TorchState::Off),
            other => Err(TorchError::InvalidState(other.to_string())),
        }
    }
}

/// Brightness fraction in `[0.0, 1.0]`.
///
/// Out of range values and NaN are rejected instead of clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct BrightnessLevel(f64);

impl BrightnessLevel {
    pub const OFF: BrightnessLevel = BrightnessLevel(0.0);
    pub const MAX: BrightnessLevel = BrightnessLevel(1.0);

    pub fn new(level: f64) -> Result<Self, TorchError> {
        if (0.0..=1.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(TorchError::InvalidBrightness(level))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Map onto a device strength range `1..=max_level`.
    ///
    /// Callers handle the zero level themselves; it is never mapped to a strength.
    pub fn to_strength(&self, max_level: u32) -> u32 {
        let max_level = max_level.max(1);
        let scaled = (self.0 * f64::from(max_level)).round() as u32;
        scaled.clamp(1, max_level)
    }
}

impl TryFrom<f64> for BrightnessLevel {
    type Error = TorchError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        BrightnessLevel::new(level)
    }
}

impl<'de> Deserialize<'de> for BrightnessLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = f64::deserialize(deserializer)?;
        BrightnessLevel::new(level).map_err(serde::de::Error::custom)
    }
}

/// A normalized torch request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorchRequest {
    State(TorchState),
    Brightness(BrightnessLevel),
}

impl From<TorchState> for TorchRequest {
    fn from(state: TorchState) -> Self {
        TorchRequest::State(state)
    }
}

impl From<BrightnessLevel> for TorchRequest {
    fn from(level: BrightnessLevel) -> Self {
        TorchRequest::Brightness(level)
    }
}

/// Read-only summary of what the torch can do right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorchCapabilities {
    pub torch_available: bool,
    pub brightness_controllable: bool,
    pub camera_id: Option<String>,
    pub max_strength_level: Option<u32>,
}

/// Operating system the crate was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parsing_is_exact() {
        assert_eq!("ON".parse::<TorchState>().unwrap(), TorchState::On);
        assert_eq!("OFF".parse::<TorchState>().unwrap(), TorchState::Off);
        assert!("on".parse::<TorchState>().is_err());
        assert!(" ON".parse::<TorchState>().is_err());
        assert!("".parse::<TorchState>().is_err());
    }

    #[test]
    fn test_brightness_bounds() {
        assert!(BrightnessLevel::new(0.0).is_ok());
        assert!(BrightnessLevel::new(1.0).is_ok());
        assert!(BrightnessLevel::new(-0.01).is_err());
        assert!(BrightnessLevel::new(1.01).is_err());
        assert!(BrightnessLevel::new(f64::NAN).is_err());
    }

    #[test]
    fn test_strength_mapping_rounds_and_clamps() {
        assert_eq!(BrightnessLevel::MAX.to_strength(5), 5);
        assert_eq!(BrightnessLevel::new(0.5).unwrap().to_strength(5), 3);
        assert_eq!(BrightnessLevel::new(0.01).unwrap().to_strength(5), 1);
        assert_eq!(BrightnessLevel::new(0.3).unwrap().to_strength(10), 3);
    }

    #[test]
    fn test_lens_facing_from_platform() {
        assert_eq!(LensFacing::from_platform(0), LensFacing::Front);
        assert_eq!(LensFacing::from_platform(1), LensFacing::Back);
        assert_eq!(LensFacing::from_platform(2), LensFacing::External);
        assert_eq!(LensFacing::from_platform(-1), LensFacing::Unknown);
    }

    #[test]
    fn test_brightness_deserialize_validates() {
        let ok: BrightnessLevel = serde_json::from_str("0.25").unwrap();
        assert_eq!(ok.value(), 0.25);
        assert!(serde_json::from_str::<BrightnessLevel>("1.5").is_err());
    }
}
