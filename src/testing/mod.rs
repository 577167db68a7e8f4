//! Testing utilities for CrabTorch
//!
//! Ready-made simulated camera layouts modelled on common phone setups, for
//! exercising the torch controller without hardware.

pub mod fixtures;

pub use fixtures::{
    external_only, phone_with_dimmable_torch, phone_with_fixed_torch, simulated_controller,
    single_level_torch, unreadable_first_camera,
};
