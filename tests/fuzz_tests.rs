//! Fuzz-style tests using proptest
//!
//! Property checks over arbitrary states, brightness levels and camera layouts.
//! Run with: cargo test --test fuzz_tests

use crabtorch::platform::{SimulatedCamera, SimulatedCameraService, TorchCall};
use crabtorch::testing::{phone_with_dimmable_torch, simulated_controller};
use crabtorch::{find_torch_camera, BrightnessLevel, LensFacing, TorchError};
use proptest::prelude::*;

fn facing() -> impl Strategy<Value = LensFacing> {
    prop_oneof![
        Just(LensFacing::Front),
        Just(LensFacing::Back),
        Just(LensFacing::External),
        Just(LensFacing::Unknown),
    ]
}

fn camera_layout() -> impl Strategy<Value = Vec<SimulatedCamera>> {
    prop::collection::vec(
        (any::<bool>(), facing(), prop::option::of(1u32..16), any::<bool>()),
        0..8,
    )
    .prop_map(|cameras| {
        cameras
            .into_iter()
            .enumerate()
            .map(|(i, (has_flash, facing, max, unreadable))| SimulatedCamera {
                id: i.to_string(),
                has_flash,
                facing,
                max_strength_level: max,
                unreadable,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Anything other than the two exact state names is rejected untouched
    #[test]
    fn fuzz_invalid_state_never_mutates(state in "\\PC*") {
        prop_assume!(state != "ON" && state != "OFF");
        let (controller, service) = simulated_controller(phone_with_dimmable_torch());

        let err = controller.set_state_str(&state).unwrap_err();
        prop_assert_eq!(err, TorchError::InvalidState(state.clone()));
        prop_assert!(service.calls().is_empty());
    }

    /// Every level in [0, 1] passes validation
    #[test]
    fn fuzz_in_range_brightness_accepted(level in 0.0f64..=1.0) {
        prop_assert!(BrightnessLevel::new(level).is_ok());
    }

    /// Levels outside [0, 1] fail validation
    #[test]
    fn fuzz_out_of_range_brightness_rejected(
        level in prop_oneof![-1.0e9f64..-1.0e-9, (1.0f64 + 1.0e-9)..1.0e9]
    ) {
        prop_assert!(matches!(BrightnessLevel::new(level), Err(TorchError::InvalidBrightness(_))));
    }

    /// Non-zero levels map inside 1..=max
    #[test]
    fn fuzz_strength_within_device_range(level in 0.0001f64..=1.0, max in 1u32..64) {
        let strength = BrightnessLevel::new(level).unwrap().to_strength(max);
        prop_assert!(strength >= 1 && strength <= max);
    }

    /// Strength grows with brightness
    #[test]
    fn fuzz_strength_is_monotonic(a in 0.0001f64..=1.0, b in 0.0001f64..=1.0, max in 1u32..64) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = BrightnessLevel::new(low).unwrap().to_strength(max);
        let high = BrightnessLevel::new(high).unwrap().to_strength(max);
        prop_assert!(low <= high);
    }

    /// Selection is the first readable back-facing camera with flash
    #[test]
    fn fuzz_selector_first_match(cameras in camera_layout()) {
        let expected = cameras
            .iter()
            .find(|c| !c.unreadable && c.has_flash && c.facing == LensFacing::Back)
            .map(|c| c.id.clone());

        let service = SimulatedCameraService::new(cameras);
        let selected = find_torch_camera(&service).map(|handle| handle.id);
        prop_assert_eq!(selected, expected);
    }

    /// At most one mutation per request, and only on the selected camera
    #[test]
    fn fuzz_brightness_touches_selected_camera_only(cameras in camera_layout(), level in 0.0f64..=1.0) {
        let service = SimulatedCameraService::new(cameras);
        let selected = find_torch_camera(&service);
        let (controller, service) = simulated_controller(service);

        let result = controller.set_brightness(BrightnessLevel::new(level).unwrap());
        let calls = service.calls();

        match selected {
            None => {
                prop_assert_eq!(result, Err(TorchError::TorchUnavailable));
                prop_assert!(calls.is_empty());
            }
            Some(handle) => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(calls.len(), 1);
                let id = match &calls[0] {
                    TorchCall::Mode { camera_id, .. } | TorchCall::Strength { camera_id, .. } => camera_id.clone(),
                };
                prop_assert_eq!(id, handle.id);
            }
        }
    }
}
