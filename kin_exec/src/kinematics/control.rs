//! Open-loop control policies
//!
//! A control policy is any `Fn(f64, &VehicleState) -> ControlInput`, called with the current time
//! and state.

use super::{ControlInput, VehicleState};

/// Function pointer form of a control policy.
pub type ControlFn = fn(f64, &VehicleState) -> ControlInput;

/// The default policy, which demands no motion.
pub fn no_control(_time_s: f64, _state: &VehicleState) -> ControlInput {
    ControlInput::default()
}

/// A policy which always demands the same input.
pub fn constant_control(input: ControlInput) -> impl Fn(f64, &VehicleState) -> ControlInput + Copy {
    move |_: f64, _: &VehicleState| input
}
